//! Handlers for the `/form-templates` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use crmboard_core::error::CoreError;
use crmboard_core::forms::validate_field_kind;
use crmboard_core::types::DbId;
use crmboard_db::models::form::{CreateFormTemplate, FormTemplate, FormTemplateWithFields};
use crmboard_db::repositories::FormTemplateRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/form-templates
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFormTemplate>,
) -> AppResult<(StatusCode, Json<FormTemplateWithFields>)> {
    input.validate()?;
    for field in &input.fields {
        validate_field_kind(&field.kind)
            .map_err(|e| CoreError::Validation(format!("Field '{}': {e}", field.label)))?;
    }
    let template = FormTemplateRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/form-templates
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<FormTemplate>>> {
    let templates = FormTemplateRepo::list(&state.pool).await?;
    Ok(Json(templates))
}

/// GET /api/v1/form-templates/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<FormTemplateWithFields>> {
    let template = FormTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FormTemplate",
            id,
        })?;
    let fields = FormTemplateRepo::fields(&state.pool, id).await?;
    Ok(Json(FormTemplateWithFields { template, fields }))
}
