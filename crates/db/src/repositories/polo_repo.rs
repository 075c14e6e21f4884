//! Repository for the `polo_projects` table.

use crmboard_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::polo::{CreatePoloProject, PoloProject};

const COLUMNS: &str = "id, name, description, overall_progress, created_at, updated_at";

pub struct PoloProjectRepo;

impl PoloProjectRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePoloProject,
    ) -> Result<PoloProject, sqlx::Error> {
        let query = format!(
            "INSERT INTO polo_projects (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PoloProject>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<PoloProject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM polo_projects WHERE id = $1");
        sqlx::query_as::<_, PoloProject>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<PoloProject>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM polo_projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, PoloProject>(&query)
            .fetch_all(pool)
            .await
    }

    /// Store a freshly computed progress percentage.
    pub async fn set_progress<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        overall_progress: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE polo_projects SET overall_progress = $2 WHERE id = $1")
            .bind(id)
            .bind(overall_progress)
            .execute(exec)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM polo_projects WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
