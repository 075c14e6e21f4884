//! Repository for the `polo_stages` table.

use crmboard_core::gantt::StageLevel;
use crmboard_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::polo::{PoloStage, StageInput};

const COLUMNS: &str = "id, polo_project_id, name, level, parent_stage_id, sort_order, \
                       starts_at, ends_at, completed, created_at, updated_at";

/// Provides persistence for Gantt stages. Hierarchy rules are checked by
/// the caller before any write.
pub struct StageRepo;

impl StageRepo {
    /// Insert a stage. Without an explicit `sort_order` it goes after its
    /// siblings (same project and parent).
    pub async fn create<'e, E: PgExecutor<'e>>(
        exec: E,
        polo_project_id: DbId,
        input: &StageInput,
    ) -> Result<PoloStage, sqlx::Error> {
        let query = format!(
            "INSERT INTO polo_stages
                (polo_project_id, name, level, parent_stage_id, sort_order, starts_at, ends_at, completed)
             VALUES (
                $1, $2, $3, $4,
                COALESCE($5, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM polo_stages
                              WHERE polo_project_id = $1
                                AND parent_stage_id IS NOT DISTINCT FROM $4)),
                $6, $7, COALESCE($8, false)
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PoloStage>(&query)
            .bind(polo_project_id)
            .bind(&input.name)
            .bind(i16::from(input.level))
            .bind(input.parent_stage_id)
            .bind(input.sort_order)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.completed)
            .fetch_one(exec)
            .await
    }

    /// Find a stage that belongs to the given polo project.
    pub async fn find_in_project<'e, E: PgExecutor<'e>>(
        exec: E,
        polo_project_id: DbId,
        id: DbId,
    ) -> Result<Option<PoloStage>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM polo_stages WHERE id = $1 AND polo_project_id = $2");
        sqlx::query_as::<_, PoloStage>(&query)
            .bind(id)
            .bind(polo_project_id)
            .fetch_optional(exec)
            .await
    }

    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        polo_project_id: DbId,
    ) -> Result<Vec<PoloStage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM polo_stages WHERE polo_project_id = $1
             ORDER BY level, sort_order, id"
        );
        sqlx::query_as::<_, PoloStage>(&query)
            .bind(polo_project_id)
            .fetch_all(exec)
            .await
    }

    /// Replace every editable field. A `None` completion flag keeps the
    /// stored value, as does a `None` sort order.
    pub async fn replace<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        input: &StageInput,
    ) -> Result<PoloStage, sqlx::Error> {
        let query = format!(
            "UPDATE polo_stages SET
                name = $2,
                level = $3,
                parent_stage_id = $4,
                sort_order = COALESCE($5, sort_order),
                starts_at = $6,
                ends_at = $7,
                completed = COALESCE($8, completed)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PoloStage>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(i16::from(input.level))
            .bind(input.parent_stage_id)
            .bind(input.sort_order)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.completed)
            .fetch_one(exec)
            .await
    }

    pub async fn set_completed<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        completed: bool,
    ) -> Result<PoloStage, sqlx::Error> {
        let query =
            format!("UPDATE polo_stages SET completed = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, PoloStage>(&query)
            .bind(id)
            .bind(completed)
            .fetch_one(exec)
            .await
    }

    /// Number of level-2 stages under a stage.
    pub async fn count_children<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM polo_stages WHERE parent_stage_id = $1")
            .bind(id)
            .fetch_one(exec)
            .await
    }

    /// `(completed, total)` stage counts for a polo project.
    pub async fn completion_counts<'e, E: PgExecutor<'e>>(
        exec: E,
        polo_project_id: DbId,
    ) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE completed), COUNT(*)
             FROM polo_stages WHERE polo_project_id = $1",
        )
        .bind(polo_project_id)
        .fetch_one(exec)
        .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM polo_stages WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete all stages of one level in a polo project.
    pub async fn delete_by_project_level<'e, E: PgExecutor<'e>>(
        exec: E,
        polo_project_id: DbId,
        level: StageLevel,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM polo_stages WHERE polo_project_id = $1 AND level = $2")
                .bind(polo_project_id)
                .bind(i16::from(level))
                .execute(exec)
                .await?;
        Ok(result.rows_affected())
    }
}
