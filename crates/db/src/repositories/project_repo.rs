//! Repository for the `projects` table.

use crmboard_core::board::{ProjectStatus, DEFAULT_COLUMNS};
use crmboard_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::column::BoardColumn;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::repositories::column_repo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, default_template_id, technical_lead_id, \
                       created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project together with its default board columns.
    ///
    /// Both inserts run in one transaction so a project never exists
    /// without its initial board.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
    ) -> Result<(Project, Vec<BoardColumn>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, status, default_template_id, technical_lead_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.unwrap_or(ProjectStatus::Active).as_str())
            .bind(input.default_template_id)
            .bind(input.technical_lead_id)
            .fetch_one(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO board_columns (project_id, name, sort_order, status, color)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            column_repo::COLUMNS
        );
        let mut columns = Vec::with_capacity(DEFAULT_COLUMNS.len());
        for (index, default) in DEFAULT_COLUMNS.iter().enumerate() {
            let column = sqlx::query_as::<_, BoardColumn>(&insert)
                .bind(project.id)
                .bind(default.name)
                .bind(index as i32)
                .bind(default.status.as_str())
                .bind(default.color)
                .fetch_one(&mut *tx)
                .await?;
            columns.push(column);
        }

        tx.commit().await?;
        Ok((project, columns))
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                default_template_id = COALESCE($5, default_template_id),
                technical_lead_id = COALESCE($6, technical_lead_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.default_template_id)
            .bind(input.technical_lead_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the project row itself. Dependents must already be gone.
    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
