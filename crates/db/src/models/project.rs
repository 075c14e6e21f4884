//! Project entity model and DTOs.

use crmboard_core::board::ProjectStatus;
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::card::Card;
use crate::models::column::BoardColumn;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub default_template_id: Option<DbId>,
    pub technical_lead_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    pub default_template_id: Option<DbId>,
    pub technical_lead_id: Option<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub default_template_id: Option<DbId>,
    pub technical_lead_id: Option<DbId>,
}

/// One column of the board view with its cards.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumnWithCards {
    #[serde(flatten)]
    pub column: BoardColumn,
    pub cards: Vec<Card>,
}

/// The kanban board of a project: columns in display order.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectBoard {
    pub project: Project,
    pub columns: Vec<BoardColumnWithCards>,
}
