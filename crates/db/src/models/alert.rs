//! Project alert model and DTOs.

use crmboard_core::board::AlertSeverity;
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub project_id: DbId,
    pub card_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub severity: AlertSeverity,
    pub message: String,
    pub resolved: bool,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for raising an alert on a project. The project comes from the path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAlert {
    pub card_id: Option<DbId>,
    /// Defaults to `info`.
    pub severity: Option<AlertSeverity>,
    #[validate(length(min = 1, max = 1000))]
    pub message: String,
}
