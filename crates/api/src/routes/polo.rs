//! Route definitions for the `/polo-projects` resource and its stages.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::polo;
use crate::state::AppState;

/// Routes mounted at `/polo-projects`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /{id}                                -> get_by_id
/// DELETE /{id}                                -> delete (+ stages)
///
/// GET    /{id}/stages                         -> list_stages
/// POST   /{id}/stages                         -> create_stage
/// PUT    /{id}/stages/{stage_id}              -> update_stage
/// DELETE /{id}/stages/{stage_id}              -> delete_stage
/// PATCH  /{id}/stages/{stage_id}/completion   -> set_stage_completion
///
/// GET    /{id}/gantt                          -> gantt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(polo::list).post(polo::create))
        .route("/{id}", get(polo::get_by_id).delete(polo::delete))
        .route(
            "/{id}/stages",
            get(polo::list_stages).post(polo::create_stage),
        )
        .route(
            "/{id}/stages/{stage_id}",
            put(polo::update_stage).delete(polo::delete_stage),
        )
        .route(
            "/{id}/stages/{stage_id}/completion",
            patch(polo::set_stage_completion),
        )
        .route("/{id}/gantt", get(polo::gantt))
}
