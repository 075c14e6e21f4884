//! Sales funnel board: columns and deal cards.

use crmboard_core::sales_funnel::FunnelCardValue;
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `sales_funnel_columns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FunnelColumn {
    pub id: DbId,
    pub name: String,
    pub sort_order: i32,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a funnel column.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFunnelColumn {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub sort_order: Option<i32>,
    #[validate(length(min = 1, max = 32))]
    pub color: Option<String>,
}

/// DTO for updating a funnel column. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFunnelColumn {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    #[validate(length(min = 1, max = 32))]
    pub color: Option<String>,
}

/// A row from the `sales_funnel_cards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FunnelCard {
    pub id: DbId,
    pub column_id: DbId,
    pub title: String,
    pub client_name: Option<String>,
    pub value_cents: i64,
    pub expected_close_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&FunnelCard> for FunnelCardValue {
    fn from(card: &FunnelCard) -> Self {
        FunnelCardValue {
            column_id: card.column_id,
            value_cents: card.value_cents,
        }
    }
}

/// DTO for creating a funnel card.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFunnelCard {
    pub column_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub client_name: Option<String>,
    #[serde(default)]
    pub value_cents: i64,
    pub expected_close_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub sort_order: Option<i32>,
}

/// DTO for updating a funnel card. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFunnelCard {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub value_cents: Option<i64>,
    pub expected_close_date: Option<Timestamp>,
    pub notes: Option<String>,
}

/// DTO for `PATCH /sales-funnel/cards/{id}/move`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveFunnelCard {
    pub column_id: DbId,
    pub sort_order: Option<i32>,
}
