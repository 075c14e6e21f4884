//! Board card model and DTOs.

use crmboard_core::board::CardPriority;
use crmboard_core::dashboard::CardSnapshot;
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cards` table.
///
/// `completion_date` is set iff the card's column has status `completed`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Card {
    pub id: DbId,
    pub project_id: DbId,
    pub column_id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: CardPriority,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub completion_date: Option<Timestamp>,
    pub assigned_technician_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Card> for CardSnapshot {
    fn from(card: &Card) -> Self {
        CardSnapshot {
            id: card.id,
            column_id: card.column_id,
            due_date: card.due_date,
            completion_date: card.completion_date,
        }
    }
}

/// DTO for creating a card.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCard {
    pub project_id: DbId,
    pub column_id: DbId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `medium`.
    pub priority: Option<CardPriority>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    /// Only honoured when the target column is `completed`.
    pub completion_date: Option<Timestamp>,
    pub assigned_technician_id: Option<DbId>,
}

/// DTO for updating a card's own fields. Column changes go through the
/// move endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCard {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<CardPriority>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
    pub assigned_technician_id: Option<DbId>,
}

/// DTO for `PATCH /cards/{id}/move`.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveCard {
    pub column_id: DbId,
}

/// Filters for card listing and dashboard queries. `None` means "any".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardFilter {
    pub project_id: Option<DbId>,
    pub column_id: Option<DbId>,
    pub technician_id: Option<DbId>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<Timestamp>,
}
