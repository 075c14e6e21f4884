use axum::routing::get;
use axum::Router;

use crate::handlers::form_template;
use crate::state::AppState;

/// Routes mounted at `/form-templates`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id (with fields)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(form_template::list).post(form_template::create))
        .route("/{id}", get(form_template::get_by_id))
}
