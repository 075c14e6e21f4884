//! Board column model and DTOs.

use crmboard_core::board::ColumnStatus;
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `board_columns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BoardColumn {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub sort_order: i32,
    #[sqlx(try_from = "String")]
    pub status: ColumnStatus,
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a column to a project. The project comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateColumn {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Defaults to `open`.
    pub status: Option<ColumnStatus>,
    #[validate(length(min = 1, max = 32))]
    pub color: Option<String>,
    /// Defaults to after the last column.
    pub sort_order: Option<i32>,
}

/// DTO for updating a column. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateColumn {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub status: Option<ColumnStatus>,
    #[validate(length(min = 1, max = 32))]
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

/// DTO for rewriting the display order of a project's columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderColumns {
    pub column_ids: Vec<DbId>,
}
