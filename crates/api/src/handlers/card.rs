//! Handlers for the `/cards` resource and card forms.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use crmboard_core::error::CoreError;
use crmboard_core::types::DbId;
use crmboard_db::models::card::{Card, CardFilter, CreateCard, MoveCard, UpdateCard};
use crmboard_db::models::form::{CardFormView, SubmitCardForm};
use crmboard_db::repositories::CardRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::services::card_lifecycle;
use crate::state::AppState;

/// GET /api/v1/cards?project_id=&column_id=&technician_id=&from=&to=
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<CardFilter>,
) -> AppResult<Json<Vec<Card>>> {
    let cards = CardRepo::list(&state.pool, &filter).await?;
    Ok(Json(cards))
}

/// POST /api/v1/cards
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateCard>,
) -> AppResult<(StatusCode, Json<Card>)> {
    input.validate()?;
    let card = card_lifecycle::create_card(&state.pool, &input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/v1/cards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Card>> {
    let card = CardRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Card", id })?;
    Ok(Json(card))
}

/// PUT /api/v1/cards/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCard>,
) -> AppResult<Json<Card>> {
    input.validate()?;
    let card = card_lifecycle::update_card(&state.pool, id, &input).await?;
    Ok(Json(card))
}

/// PATCH /api/v1/cards/{id}/move
pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MoveCard>,
) -> AppResult<Json<Card>> {
    let card = card_lifecycle::move_card(&state.pool, id, input.column_id, Utc::now()).await?;
    Ok(Json(card))
}

/// DELETE /api/v1/cards/{id}
///
/// Requires a bearer token whose user holds a card-deleting role.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    card_lifecycle::delete_card(&state.pool, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cards/{id}/form
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<CardFormView>> {
    let view = card_lifecycle::card_form(&state.pool, id).await?;
    Ok(Json(view))
}

/// POST /api/v1/cards/{id}/form
pub async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SubmitCardForm>,
) -> AppResult<Json<CardFormView>> {
    let view = card_lifecycle::submit_card_form(&state.pool, id, input).await?;
    Ok(Json(view))
}
