//! Repository for the `cards` table.

use crmboard_core::board::CardPriority;
use crmboard_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::card::{Card, CardFilter, CreateCard, UpdateCard};

const COLUMNS: &str = "id, project_id, column_id, title, description, priority, start_date, \
                       due_date, completion_date, assigned_technician_id, created_at, updated_at";

/// Provides persistence for board cards.
///
/// Completion-date decisions are made by the caller; this repo only writes
/// what it is given.
pub struct CardRepo;

impl CardRepo {
    /// Insert a card with an already-resolved completion date.
    pub async fn create<'e, E: PgExecutor<'e>>(
        exec: E,
        input: &CreateCard,
        completion_date: Option<Timestamp>,
    ) -> Result<Card, sqlx::Error> {
        let query = format!(
            "INSERT INTO cards (project_id, column_id, title, description, priority, start_date,
                                due_date, completion_date, assigned_technician_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(input.project_id)
            .bind(input.column_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.priority.unwrap_or(CardPriority::Medium).as_str())
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(completion_date)
            .bind(input.assigned_technician_id)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Like [`find_by_id`](Self::find_by_id) but locks the row until the
    /// surrounding transaction ends, serialising concurrent moves.
    pub async fn find_for_update<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cards WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List cards matching every set filter, newest first.
    pub async fn list<'e, E: PgExecutor<'e>>(
        exec: E,
        filter: &CardFilter,
    ) -> Result<Vec<Card>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cards
             WHERE ($1::BIGINT IS NULL OR project_id = $1)
               AND ($2::BIGINT IS NULL OR column_id = $2)
               AND ($3::BIGINT IS NULL OR assigned_technician_id = $3)
               AND ($4::TIMESTAMPTZ IS NULL OR created_at >= $4)
               AND ($5::TIMESTAMPTZ IS NULL OR created_at <= $5)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(filter.project_id)
            .bind(filter.column_id)
            .bind(filter.technician_id)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(exec)
            .await
    }

    /// Cards of a project, grouped for the board view.
    pub async fn list_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
    ) -> Result<Vec<Card>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM cards WHERE project_id = $1 ORDER BY column_id, id");
        sqlx::query_as::<_, Card>(&query)
            .bind(project_id)
            .fetch_all(exec)
            .await
    }

    /// Update a card's own fields. Only non-`None` fields are applied.
    pub async fn update<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        input: &UpdateCard,
    ) -> Result<Option<Card>, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                start_date = COALESCE($5, start_date),
                due_date = COALESCE($6, due_date),
                assigned_technician_id = COALESCE($7, assigned_technician_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.priority.map(CardPriority::as_str))
            .bind(input.start_date)
            .bind(input.due_date)
            .bind(input.assigned_technician_id)
            .fetch_optional(exec)
            .await
    }

    /// Write a card's column and completion date together.
    pub async fn set_column<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        column_id: DbId,
        completion_date: Option<Timestamp>,
    ) -> Result<Card, sqlx::Error> {
        let query = format!(
            "UPDATE cards SET column_id = $2, completion_date = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Card>(&query)
            .bind(id)
            .bind(column_id)
            .bind(completion_date)
            .fetch_one(exec)
            .await
    }

    /// Stamp `completion_date = now` on cards of a column that lack one.
    pub async fn stamp_missing_completion<'e, E: PgExecutor<'e>>(
        exec: E,
        column_id: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cards SET completion_date = $2
             WHERE column_id = $1 AND completion_date IS NULL",
        )
        .bind(column_id)
        .bind(now)
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// Clear the completion date of every card in a column.
    pub async fn clear_completion<'e, E: PgExecutor<'e>>(
        exec: E,
        column_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cards SET completion_date = NULL
             WHERE column_id = $1 AND completion_date IS NOT NULL",
        )
        .bind(column_id)
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// Ids of every card belonging to a project.
    pub async fn ids_by_project<'e, E: PgExecutor<'e>>(
        exec: E,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM cards WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(exec)
            .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a set of cards. Returns the number removed.
    pub async fn delete_by_ids<'e, E: PgExecutor<'e>>(
        exec: E,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM cards WHERE id = ANY($1)")
            .bind(ids)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
