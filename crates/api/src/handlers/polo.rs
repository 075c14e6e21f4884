//! Handlers for polo projects, their stages, and the Gantt view.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use crmboard_core::error::CoreError;
use crmboard_core::gantt::{build_layout, GanttStage};
use crmboard_core::types::DbId;
use crmboard_db::models::polo::{
    CreatePoloProject, GanttView, PoloProject, PoloStage, SetStageCompletion, StageInput,
};
use crmboard_db::repositories::{PoloProjectRepo, StageRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::services::{cascade, stage_lifecycle};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Polo projects
// ---------------------------------------------------------------------------

/// POST /api/v1/polo-projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePoloProject>,
) -> AppResult<(StatusCode, Json<PoloProject>)> {
    input.validate()?;
    let project = PoloProjectRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/polo-projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<PoloProject>>> {
    let projects = PoloProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/polo-projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PoloProject>> {
    let project = find_polo_project(&state, id).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/polo-projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    cascade::delete_polo_project(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// GET /api/v1/polo-projects/{id}/stages
pub async fn list_stages(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<PoloStage>>> {
    find_polo_project(&state, id).await?;
    let stages = StageRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(stages))
}

/// POST /api/v1/polo-projects/{id}/stages
pub async fn create_stage(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StageInput>,
) -> AppResult<(StatusCode, Json<PoloStage>)> {
    input.validate()?;
    let stage = stage_lifecycle::create_stage(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(stage)))
}

/// PUT /api/v1/polo-projects/{id}/stages/{stage_id}
pub async fn update_stage(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(DbId, DbId)>,
    Json(input): Json<StageInput>,
) -> AppResult<Json<PoloStage>> {
    input.validate()?;
    let stage = stage_lifecycle::update_stage(&state.pool, id, stage_id, &input).await?;
    Ok(Json(stage))
}

/// DELETE /api/v1/polo-projects/{id}/stages/{stage_id}
pub async fn delete_stage(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    stage_lifecycle::delete_stage(&state.pool, id, stage_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/polo-projects/{id}/stages/{stage_id}/completion
pub async fn set_stage_completion(
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(DbId, DbId)>,
    Json(input): Json<SetStageCompletion>,
) -> AppResult<Json<PoloStage>> {
    let stage =
        stage_lifecycle::set_stage_completion(&state.pool, id, stage_id, input.completed).await?;
    Ok(Json(stage))
}

// ---------------------------------------------------------------------------
// Gantt
// ---------------------------------------------------------------------------

/// GET /api/v1/polo-projects/{id}/gantt
///
/// Stages are returned in row order, matching `rows` one to one.
pub async fn gantt(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<GanttView>> {
    let project = find_polo_project(&state, id).await?;
    let stages = StageRepo::list_by_project(&state.pool, id).await?;

    let geometry: Vec<GanttStage> = stages.iter().map(GanttStage::from).collect();
    let layout = build_layout(&geometry, state.config.calendar_offset);

    let mut by_id: HashMap<DbId, PoloStage> = stages.into_iter().map(|s| (s.id, s)).collect();
    let stages = layout
        .rows
        .iter()
        .filter_map(|row| by_id.remove(&row.stage_id))
        .collect();

    Ok(Json(GanttView {
        project,
        stages,
        layout,
    }))
}

async fn find_polo_project(state: &AppState, id: DbId) -> AppResult<PoloProject> {
    let project = PoloProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PoloProject",
            id,
        })?;
    Ok(project)
}
