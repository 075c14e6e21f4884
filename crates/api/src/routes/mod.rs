pub mod alert;
pub mod card;
pub mod column;
pub mod dashboard;
pub mod form_template;
pub mod health;
pub mod polo;
pub mod project;
pub mod sales_funnel;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                   list, create
/// /projects/{id}                              get, update, cascade delete
/// /projects/{id}/board                        columns with cards
/// /projects/{id}/columns                      list, create
/// /projects/{id}/columns/order                reorder
/// /projects/{id}/alerts                       list, create
///
/// /columns/{id}                               update, delete
/// /alerts/{id}/resolve                        resolve
///
/// /cards                                      list, create
/// /cards/{id}                                 get, update, delete (auth)
/// /cards/{id}/move                            move
/// /cards/{id}/form                            get, submit
///
/// /form-templates                             list, create
/// /form-templates/{id}                        get
///
/// /dashboard/stats                            counters
/// /dashboard/completion-trend                 trailing 12 buckets
///
/// /polo-projects                              list, create
/// /polo-projects/{id}                         get, delete
/// /polo-projects/{id}/stages                  list, create
/// /polo-projects/{id}/stages/{stage_id}       update, delete
/// /polo-projects/{id}/stages/{stage_id}/completion
/// /polo-projects/{id}/gantt                   timeline layout
///
/// /sales-funnel/columns[/{id}]                CRUD
/// /sales-funnel/cards[/{id}[/move]]           CRUD, move
/// /sales-funnel/summary                       per-column totals
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/columns", column::router())
        .nest("/alerts", alert::router())
        .nest("/cards", card::router())
        .nest("/form-templates", form_template::router())
        .nest("/dashboard", dashboard::router())
        .nest("/polo-projects", polo::router())
        .nest("/sales-funnel", sales_funnel::router())
}
