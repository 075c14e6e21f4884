//! Repository for the `users` table.

use crmboard_core::roles::Role;
use crmboard_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{CreateUser, User};

const COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// Read access to users plus provisioning for tests and seeding.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create<'e, E: PgExecutor<'e>>(
        exec: E,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, role) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.role.as_str())
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Current role of a user, or `None` if the user does not exist.
    pub async fn find_role<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<Role>, sqlx::Error> {
        Ok(Self::find_by_id(exec, id).await?.map(|u| u.role))
    }
}
