use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::sales_funnel;
use crate::state::AppState;

/// Routes mounted at `/sales-funnel`.
///
/// ```text
/// GET    /columns              -> list_columns
/// POST   /columns              -> create_column
/// PUT    /columns/{id}         -> update_column
/// DELETE /columns/{id}         -> delete_column (409 while cards remain)
///
/// GET    /cards                -> list_cards (?column_id=)
/// POST   /cards                -> create_card
/// PUT    /cards/{id}           -> update_card
/// DELETE /cards/{id}           -> delete_card
/// PATCH  /cards/{id}/move      -> move_card
///
/// GET    /summary              -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/columns",
            get(sales_funnel::list_columns).post(sales_funnel::create_column),
        )
        .route(
            "/columns/{id}",
            put(sales_funnel::update_column).delete(sales_funnel::delete_column),
        )
        .route(
            "/cards",
            get(sales_funnel::list_cards).post(sales_funnel::create_card),
        )
        .route(
            "/cards/{id}",
            put(sales_funnel::update_card).delete(sales_funnel::delete_card),
        )
        .route("/cards/{id}/move", patch(sales_funnel::move_card))
        .route("/summary", get(sales_funnel::summary))
}
