//! Handlers for the dashboard aggregates.
//!
//! Both endpoints read current card and column state and compute the
//! result on demand; nothing is cached.

use std::collections::HashSet;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use crmboard_core::dashboard::{
    completion_trend, compute_stats, CardSnapshot, DashboardStats, TrendBucket, TrendPeriod,
};
use crmboard_core::types::DbId;
use crmboard_db::models::card::CardFilter;
use crmboard_db::repositories::{CardRepo, ColumnRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::query::{DashboardParams, TrendParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Trend response: the chosen period and its buckets, oldest first.
#[derive(Debug, Serialize)]
pub struct CompletionTrend {
    pub period: TrendPeriod,
    pub buckets: Vec<TrendBucket>,
}

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<DataResponse<DashboardStats>>> {
    let filter = CardFilter {
        project_id: params.project_id,
        technician_id: params.technician_id,
        from: params.from,
        to: params.to,
        ..CardFilter::default()
    };
    let cards = load_snapshots(&state, &filter).await?;
    let completed_columns: HashSet<DbId> = ColumnRepo::completed_ids(&state.pool)
        .await?
        .into_iter()
        .collect();

    let outcome = compute_stats(
        &cards,
        &completed_columns,
        Utc::now(),
        state.config.calendar_offset,
    );
    if !outcome.inconsistent_card_ids.is_empty() {
        tracing::warn!(
            card_ids = ?outcome.inconsistent_card_ids,
            "Cards in completed columns have no completion date"
        );
    }

    Ok(Json(DataResponse {
        data: outcome.stats,
    }))
}

/// GET /api/v1/dashboard/completion-trend
pub async fn trend(
    State(state): State<AppState>,
    Query(params): Query<TrendParams>,
) -> AppResult<Json<DataResponse<CompletionTrend>>> {
    let period = params.period.unwrap_or(TrendPeriod::Month);
    let filter = CardFilter {
        project_id: params.project_id,
        technician_id: params.technician_id,
        from: params.from,
        to: params.to,
        ..CardFilter::default()
    };
    let cards = load_snapshots(&state, &filter).await?;
    let buckets = completion_trend(&cards, period, Utc::now(), state.config.calendar_offset);

    Ok(Json(DataResponse {
        data: CompletionTrend { period, buckets },
    }))
}

async fn load_snapshots(state: &AppState, filter: &CardFilter) -> AppResult<Vec<CardSnapshot>> {
    let cards = CardRepo::list(&state.pool, filter).await?;
    Ok(cards.iter().map(CardSnapshot::from).collect())
}
