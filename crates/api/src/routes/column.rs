//! Route definitions for the `/columns` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::column;
use crate::state::AppState;

/// Routes mounted at `/columns`.
///
/// ```text
/// PUT    /{id}    -> update (re-syncs card completion dates on status change)
/// DELETE /{id}    -> delete (409 while cards remain)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(column::update).delete(column::delete))
}
