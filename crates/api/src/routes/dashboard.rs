use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /stats               -> stats (project_id, technician_id, from, to)
/// GET    /completion-trend    -> trend (same filters + period)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/completion-trend", get(dashboard::trend))
}
