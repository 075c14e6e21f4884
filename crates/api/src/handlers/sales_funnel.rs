//! Handlers for the sales funnel board.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crmboard_core::error::CoreError;
use crmboard_core::sales_funnel::{summarize, validate_value_cents, FunnelCardValue, FunnelSummary};
use crmboard_core::types::DbId;
use crmboard_db::models::sales_funnel::{
    CreateFunnelCard, CreateFunnelColumn, FunnelCard, FunnelColumn, MoveFunnelCard,
    UpdateFunnelCard, UpdateFunnelColumn,
};
use crmboard_db::repositories::{FunnelCardRepo, FunnelColumnRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::query::FunnelCardParams;
use crate::response::DataResponse;
use crate::services::cascade;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// GET /api/v1/sales-funnel/columns
pub async fn list_columns(State(state): State<AppState>) -> AppResult<Json<Vec<FunnelColumn>>> {
    let columns = FunnelColumnRepo::list(&state.pool).await?;
    Ok(Json(columns))
}

/// POST /api/v1/sales-funnel/columns
pub async fn create_column(
    State(state): State<AppState>,
    Json(input): Json<CreateFunnelColumn>,
) -> AppResult<(StatusCode, Json<FunnelColumn>)> {
    input.validate()?;
    let column = FunnelColumnRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(column)))
}

/// PUT /api/v1/sales-funnel/columns/{id}
pub async fn update_column(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFunnelColumn>,
) -> AppResult<Json<FunnelColumn>> {
    input.validate()?;
    let column = FunnelColumnRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FunnelColumn",
            id,
        })?;
    Ok(Json(column))
}

/// DELETE /api/v1/sales-funnel/columns/{id}
pub async fn delete_column(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    cascade::delete_funnel_column(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

/// GET /api/v1/sales-funnel/cards?column_id=
pub async fn list_cards(
    State(state): State<AppState>,
    Query(params): Query<FunnelCardParams>,
) -> AppResult<Json<Vec<FunnelCard>>> {
    let cards = FunnelCardRepo::list(&state.pool, params.column_id).await?;
    Ok(Json(cards))
}

/// POST /api/v1/sales-funnel/cards
pub async fn create_card(
    State(state): State<AppState>,
    Json(input): Json<CreateFunnelCard>,
) -> AppResult<(StatusCode, Json<FunnelCard>)> {
    input.validate()?;
    validate_value_cents(input.value_cents)?;
    ensure_column(&state, input.column_id).await?;
    let card = FunnelCardRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// PUT /api/v1/sales-funnel/cards/{id}
pub async fn update_card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateFunnelCard>,
) -> AppResult<Json<FunnelCard>> {
    input.validate()?;
    if let Some(value_cents) = input.value_cents {
        validate_value_cents(value_cents)?;
    }
    let card = FunnelCardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FunnelCard",
            id,
        })?;
    Ok(Json(card))
}

/// PATCH /api/v1/sales-funnel/cards/{id}/move
pub async fn move_card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MoveFunnelCard>,
) -> AppResult<Json<FunnelCard>> {
    ensure_column(&state, input.column_id).await?;
    let card = FunnelCardRepo::move_to(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FunnelCard",
            id,
        })?;
    tracing::info!(card_id = id, column_id = input.column_id, "Funnel card moved");
    Ok(Json(card))
}

/// DELETE /api/v1/sales-funnel/cards/{id}
pub async fn delete_card(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if FunnelCardRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "FunnelCard",
            id,
        }
        .into())
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// GET /api/v1/sales-funnel/summary
pub async fn summary(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<FunnelSummary>>> {
    let columns = FunnelColumnRepo::list(&state.pool).await?;
    let cards = FunnelCardRepo::list(&state.pool, None).await?;

    let order: Vec<DbId> = columns.iter().map(|c| c.id).collect();
    let values: Vec<FunnelCardValue> = cards.iter().map(FunnelCardValue::from).collect();

    Ok(Json(DataResponse {
        data: summarize(&order, &values),
    }))
}

async fn ensure_column(state: &AppState, column_id: DbId) -> AppResult<()> {
    FunnelColumnRepo::find_by_id(&state.pool, column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FunnelColumn",
            id: column_id,
        })?;
    Ok(())
}
