//! Route definitions for the `/cards` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::card;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// GET    /               -> list (filters: project_id, column_id, technician_id, from, to)
/// POST   /               -> create (+ form response)
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete (auth required, role checked)
/// PATCH  /{id}/move      -> move_card
/// GET    /{id}/form      -> get_form
/// POST   /{id}/form      -> submit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(card::list).post(card::create))
        .route(
            "/{id}",
            get(card::get_by_id).put(card::update).delete(card::delete),
        )
        .route("/{id}/move", patch(card::move_card))
        .route("/{id}/form", get(card::get_form).post(card::submit_form))
}
