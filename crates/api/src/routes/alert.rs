use axum::routing::patch;
use axum::Router;

use crate::handlers::alert;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// PATCH  /{id}/resolve    -> resolve
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/resolve", patch(alert::resolve))
}
