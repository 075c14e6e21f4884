//! Repository for the `alerts` table.

use crmboard_core::board::AlertSeverity;
use crmboard_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::alert::{Alert, CreateAlert};

const COLUMNS: &str =
    "id, project_id, card_id, severity, message, resolved, resolved_at, created_at";

pub struct AlertRepo;

impl AlertRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateAlert,
    ) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (project_id, card_id, severity, message) VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(project_id)
            .bind(input.card_id)
            .bind(input.severity.unwrap_or(AlertSeverity::Info).as_str())
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// Alerts of a project, unresolved first, newest first within each group.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE project_id = $1
             ORDER BY resolved, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Mark an alert resolved. Resolving twice keeps the first timestamp.
    pub async fn resolve(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET resolved = true, resolved_at = COALESCE(resolved_at, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Detach alerts from a card that is about to be deleted.
    pub async fn detach_card<'e, E: PgExecutor<'e>>(
        exec: E,
        card_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE alerts SET card_id = NULL WHERE card_id = $1")
            .bind(card_id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alerts WHERE project_id = $1")
            .bind(project_id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
