//! Repositories for the sales funnel board.

use crmboard_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::sales_funnel::{
    CreateFunnelCard, CreateFunnelColumn, FunnelCard, FunnelColumn, MoveFunnelCard,
    UpdateFunnelCard, UpdateFunnelColumn,
};

const COLUMN_COLUMNS: &str = "id, name, sort_order, color, created_at, updated_at";
const CARD_COLUMNS: &str = "id, column_id, title, client_name, value_cents, \
                            expected_close_date, notes, sort_order, created_at, updated_at";

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

pub struct FunnelColumnRepo;

impl FunnelColumnRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateFunnelColumn,
    ) -> Result<FunnelColumn, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales_funnel_columns (name, sort_order, color)
             VALUES (
                $1,
                COALESCE($2, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM sales_funnel_columns)),
                COALESCE($3, '#94a3b8')
             )
             RETURNING {COLUMN_COLUMNS}"
        );
        sqlx::query_as::<_, FunnelColumn>(&query)
            .bind(&input.name)
            .bind(input.sort_order)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<FunnelColumn>, sqlx::Error> {
        let query = format!("SELECT {COLUMN_COLUMNS} FROM sales_funnel_columns WHERE id = $1");
        sqlx::query_as::<_, FunnelColumn>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// All columns in display order.
    pub async fn list<'e, E: PgExecutor<'e>>(exec: E) -> Result<Vec<FunnelColumn>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMN_COLUMNS} FROM sales_funnel_columns ORDER BY sort_order, id");
        sqlx::query_as::<_, FunnelColumn>(&query)
            .fetch_all(exec)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFunnelColumn,
    ) -> Result<Option<FunnelColumn>, sqlx::Error> {
        let query = format!(
            "UPDATE sales_funnel_columns SET
                name = COALESCE($2, name),
                sort_order = COALESCE($3, sort_order),
                color = COALESCE($4, color)
             WHERE id = $1
             RETURNING {COLUMN_COLUMNS}"
        );
        sqlx::query_as::<_, FunnelColumn>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.sort_order)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_cards<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sales_funnel_cards WHERE column_id = $1")
            .bind(id)
            .fetch_one(exec)
            .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(exec: E, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sales_funnel_columns WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

pub struct FunnelCardRepo;

impl FunnelCardRepo {
    /// Insert a card at the end of its column unless `sort_order` is given.
    pub async fn create(pool: &PgPool, input: &CreateFunnelCard) -> Result<FunnelCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO sales_funnel_cards
                (column_id, title, client_name, value_cents, expected_close_date, notes, sort_order)
             VALUES (
                $1, $2, $3, $4, $5, $6,
                COALESCE($7, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                              FROM sales_funnel_cards WHERE column_id = $1))
             )
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, FunnelCard>(&query)
            .bind(input.column_id)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(input.value_cents)
            .bind(input.expected_close_date)
            .bind(&input.notes)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FunnelCard>, sqlx::Error> {
        let query = format!("SELECT {CARD_COLUMNS} FROM sales_funnel_cards WHERE id = $1");
        sqlx::query_as::<_, FunnelCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Cards, optionally restricted to one column, in board order.
    pub async fn list<'e, E: PgExecutor<'e>>(
        exec: E,
        column_id: Option<DbId>,
    ) -> Result<Vec<FunnelCard>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM sales_funnel_cards
             WHERE ($1::BIGINT IS NULL OR column_id = $1)
             ORDER BY column_id, sort_order, id"
        );
        sqlx::query_as::<_, FunnelCard>(&query)
            .bind(column_id)
            .fetch_all(exec)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFunnelCard,
    ) -> Result<Option<FunnelCard>, sqlx::Error> {
        let query = format!(
            "UPDATE sales_funnel_cards SET
                title = COALESCE($2, title),
                client_name = COALESCE($3, client_name),
                value_cents = COALESCE($4, value_cents),
                expected_close_date = COALESCE($5, expected_close_date),
                notes = COALESCE($6, notes)
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, FunnelCard>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.client_name)
            .bind(input.value_cents)
            .bind(input.expected_close_date)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Move a card to another column, at the end unless `sort_order` is given.
    pub async fn move_to(
        pool: &PgPool,
        id: DbId,
        input: &MoveFunnelCard,
    ) -> Result<Option<FunnelCard>, sqlx::Error> {
        let query = format!(
            "UPDATE sales_funnel_cards SET
                column_id = $2,
                sort_order = COALESCE($3, (SELECT COALESCE(MAX(sort_order) + 1, 0)
                                           FROM sales_funnel_cards
                                           WHERE column_id = $2 AND id <> $1))
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        );
        sqlx::query_as::<_, FunnelCard>(&query)
            .bind(id)
            .bind(input.column_id)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sales_funnel_cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
