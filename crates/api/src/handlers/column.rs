//! Handlers for board columns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use crmboard_core::types::DbId;
use crmboard_db::models::column::{BoardColumn, CreateColumn, ReorderColumns, UpdateColumn};
use crmboard_db::repositories::ColumnRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::services::{cascade, column_lifecycle};
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/columns
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<BoardColumn>>> {
    find_project(&state, project_id).await?;
    let columns = ColumnRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(columns))
}

/// POST /api/v1/projects/{project_id}/columns
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateColumn>,
) -> AppResult<(StatusCode, Json<BoardColumn>)> {
    input.validate()?;
    find_project(&state, project_id).await?;
    let column = ColumnRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

/// PUT /api/v1/projects/{project_id}/columns/order
pub async fn reorder(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<ReorderColumns>,
) -> AppResult<Json<Vec<BoardColumn>>> {
    let columns =
        column_lifecycle::reorder_columns(&state.pool, project_id, &input.column_ids).await?;
    Ok(Json(columns))
}

/// PUT /api/v1/columns/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateColumn>,
) -> AppResult<Json<BoardColumn>> {
    input.validate()?;
    let column = column_lifecycle::update_column(&state.pool, id, &input, Utc::now()).await?;
    Ok(Json(column))
}

/// DELETE /api/v1/columns/{id}
///
/// Fails with 409 while the column still holds cards.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    cascade::delete_column(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
