//! Route definitions for the `/projects` resource.
//!
//! Also nests project-scoped columns and alerts.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{alert, column, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete (cascade)
/// GET    /{id}/board                -> board
///
/// GET    /{id}/columns              -> column::list_by_project
/// POST   /{id}/columns              -> column::create
/// PUT    /{id}/columns/order        -> column::reorder
///
/// GET    /{id}/alerts               -> alert::list_by_project
/// POST   /{id}/alerts               -> alert::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/board", get(project::board))
        .route(
            "/{id}/columns",
            get(column::list_by_project).post(column::create),
        )
        .route("/{id}/columns/order", put(column::reorder))
        .route(
            "/{id}/alerts",
            get(alert::list_by_project).post(alert::create),
        )
}
