//! Handlers for project alerts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use crmboard_core::error::CoreError;
use crmboard_core::types::DbId;
use crmboard_db::models::alert::{Alert, CreateAlert};
use crmboard_db::repositories::{AlertRepo, CardRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::project::find_project;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/alerts
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Alert>>> {
    find_project(&state, project_id).await?;
    let alerts = AlertRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(alerts))
}

/// POST /api/v1/projects/{project_id}/alerts
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateAlert>,
) -> AppResult<(StatusCode, Json<Alert>)> {
    input.validate()?;
    find_project(&state, project_id).await?;
    if let Some(card_id) = input.card_id {
        let card = CardRepo::find_by_id(&state.pool, card_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Card",
                id: card_id,
            })?;
        if card.project_id != project_id {
            return Err(CoreError::Validation(format!(
                "Card {card_id} does not belong to project {project_id}"
            ))
            .into());
        }
    }
    let alert = AlertRepo::create(&state.pool, project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// PATCH /api/v1/alerts/{id}/resolve
pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Alert>> {
    let alert = AlertRepo::resolve(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Alert", id })?;
    Ok(Json(alert))
}
