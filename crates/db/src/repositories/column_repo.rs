//! Repository for the `board_columns` table.

use crmboard_core::board::ColumnStatus;
use crmboard_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::column::{BoardColumn, CreateColumn, UpdateColumn};

pub(crate) const COLUMNS: &str =
    "id, project_id, name, sort_order, status, color, created_at, updated_at";

/// Provides CRUD operations for board columns.
pub struct ColumnRepo;

impl ColumnRepo {
    /// Insert a column. Without an explicit `sort_order` it goes after the
    /// project's last column.
    pub async fn create<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
        input: &CreateColumn,
    ) -> Result<BoardColumn, sqlx::Error> {
        let query = format!(
            "INSERT INTO board_columns (project_id, name, sort_order, status, color)
             VALUES (
                $1, $2,
                COALESCE($3, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                              FROM board_columns WHERE project_id = $1)),
                $4,
                COALESCE($5, '#94a3b8')
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardColumn>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(input.sort_order)
            .bind(input.status.unwrap_or(ColumnStatus::Open).as_str())
            .bind(&input.color)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<BoardColumn>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM board_columns WHERE id = $1");
        sqlx::query_as::<_, BoardColumn>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Columns of a project in display order.
    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
    ) -> Result<Vec<BoardColumn>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM board_columns WHERE project_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, BoardColumn>(&query)
            .bind(project_id)
            .fetch_all(exec)
            .await
    }

    /// Update a column. Only non-`None` fields in `input` are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        input: &UpdateColumn,
    ) -> Result<Option<BoardColumn>, sqlx::Error> {
        let query = format!(
            "UPDATE board_columns SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                color = COALESCE($4, color),
                sort_order = COALESCE($5, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardColumn>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.status.map(ColumnStatus::as_str))
            .bind(&input.color)
            .bind(input.sort_order)
            .fetch_optional(exec)
            .await
    }

    /// Set one column's position. Used by reordering.
    pub async fn set_sort_order<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        project_id: DbId,
        sort_order: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE board_columns SET sort_order = $3 WHERE id = $1 AND project_id = $2",
        )
        .bind(id)
        .bind(project_id)
        .bind(sort_order)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids of every column with status `completed`, across all projects.
    pub async fn completed_ids<'e, E: PgExecutor<'e>>(exec: E) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM board_columns WHERE status = $1")
            .bind(ColumnStatus::Completed.as_str())
            .fetch_all(exec)
            .await
    }

    /// Number of cards currently in a column.
    pub async fn count_cards<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE column_id = $1")
            .bind(id)
            .fetch_one(exec)
            .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM board_columns WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every column of a project. Returns the number removed.
    pub async fn delete_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM board_columns WHERE project_id = $1")
            .bind(project_id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
