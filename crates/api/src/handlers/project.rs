//! Handlers for the `/projects` resource.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use crmboard_core::error::CoreError;
use crmboard_core::types::DbId;
use crmboard_db::models::card::Card;
use crmboard_db::models::column::BoardColumn;
use crmboard_db::models::project::{
    BoardColumnWithCards, CreateProject, Project, ProjectBoard, UpdateProject,
};
use crmboard_db::repositories::{CardRepo, ColumnRepo, ProjectRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::services::cascade;
use crate::state::AppState;

/// A newly created project with its default columns.
#[derive(Debug, Serialize)]
pub struct CreatedProject {
    #[serde(flatten)]
    pub project: Project,
    pub columns: Vec<BoardColumn>,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<CreatedProject>)> {
    input.validate()?;
    let (project, columns) = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, columns = columns.len(), "Project created");
    Ok((StatusCode::CREATED, Json(CreatedProject { project, columns })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = find_project(&state, id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes alerts, form data, cards, and columns before the project.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    cascade::delete_project(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/board
pub async fn board(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectBoard>> {
    let project = find_project(&state, id).await?;
    let columns = ColumnRepo::list_by_project(&state.pool, id).await?;

    let mut by_column: HashMap<DbId, Vec<Card>> = HashMap::new();
    for card in CardRepo::list_by_project(&state.pool, id).await? {
        by_column.entry(card.column_id).or_default().push(card);
    }

    let columns = columns
        .into_iter()
        .map(|column| {
            let cards = by_column.remove(&column.id).unwrap_or_default();
            BoardColumnWithCards { column, cards }
        })
        .collect();

    Ok(Json(ProjectBoard { project, columns }))
}

pub(crate) async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id,
        })?;
    Ok(project)
}
