//! Polo projects and their Gantt stages.

use crmboard_core::gantt::{GanttLayout, GanttStage, StageLevel};
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `polo_projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PoloProject {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Percentage of completed stages, 0-100.
    pub overall_progress: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a polo project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePoloProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

/// A row from the `polo_stages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PoloStage {
    pub id: DbId,
    pub polo_project_id: DbId,
    pub name: String,
    #[sqlx(try_from = "i16")]
    pub level: StageLevel,
    pub parent_stage_id: Option<DbId>,
    pub sort_order: i32,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&PoloStage> for GanttStage {
    fn from(stage: &PoloStage) -> Self {
        GanttStage {
            id: stage.id,
            level: stage.level,
            parent_stage_id: stage.parent_stage_id,
            sort_order: stage.sort_order,
            starts_at: stage.starts_at,
            ends_at: stage.ends_at,
        }
    }
}

/// DTO for creating a stage and, with `PUT`, for replacing one.
///
/// On update a missing `completed` keeps the current flag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StageInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub level: StageLevel,
    pub parent_stage_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub completed: Option<bool>,
}

/// DTO for `PATCH .../stages/{id}/completion`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetStageCompletion {
    pub completed: bool,
}

/// Response body of the Gantt endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GanttView {
    pub project: PoloProject,
    /// Stages in row order.
    pub stages: Vec<PoloStage>,
    #[serde(flatten)]
    pub layout: GanttLayout,
}
