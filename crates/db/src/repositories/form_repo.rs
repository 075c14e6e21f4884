//! Repositories for form templates, form responses, and form answers.

use crmboard_core::forms::{AnswerValue, FormResponseStatus};
use crmboard_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::form::{
    CreateFormTemplate, FormAnswer, FormResponse, FormTemplate, FormTemplateField,
    FormTemplateWithFields,
};

const TEMPLATE_COLUMNS: &str = "id, name, description, created_at, updated_at";
const FIELD_COLUMNS: &str = "id, template_id, label, kind, required, sort_order, created_at";
const RESPONSE_COLUMNS: &str = "id, card_id, template_id, status, created_at, updated_at";
const ANSWER_COLUMNS: &str = "id, response_id, field_id, value, created_at";

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub struct FormTemplateRepo;

impl FormTemplateRepo {
    /// Insert a template and its fields in one transaction. Field
    /// `sort_order` follows the input order.
    pub async fn create(
        pool: &PgPool,
        input: &CreateFormTemplate,
    ) -> Result<FormTemplateWithFields, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO form_templates (name, description) VALUES ($1, $2)
             RETURNING {TEMPLATE_COLUMNS}"
        );
        let template = sqlx::query_as::<_, FormTemplate>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO form_template_fields (template_id, label, kind, required, sort_order)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {FIELD_COLUMNS}"
        );
        let mut fields = Vec::with_capacity(input.fields.len());
        for (index, field) in input.fields.iter().enumerate() {
            let row = sqlx::query_as::<_, FormTemplateField>(&insert)
                .bind(template.id)
                .bind(&field.label)
                .bind(Json(&field.kind))
                .bind(field.required)
                .bind(index as i32)
                .fetch_one(&mut *tx)
                .await?;
            fields.push(row);
        }

        tx.commit().await?;
        Ok(FormTemplateWithFields { template, fields })
    }

    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
    ) -> Result<Option<FormTemplate>, sqlx::Error> {
        let query = format!("SELECT {TEMPLATE_COLUMNS} FROM form_templates WHERE id = $1");
        sqlx::query_as::<_, FormTemplate>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<FormTemplate>, sqlx::Error> {
        let query = format!("SELECT {TEMPLATE_COLUMNS} FROM form_templates ORDER BY name, id");
        sqlx::query_as::<_, FormTemplate>(&query)
            .fetch_all(pool)
            .await
    }

    /// Fields of a template in display order.
    pub async fn fields<'e, E: PgExecutor<'e>>(
        exec: E,
        template_id: DbId,
    ) -> Result<Vec<FormTemplateField>, sqlx::Error> {
        let query = format!(
            "SELECT {FIELD_COLUMNS} FROM form_template_fields
             WHERE template_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, FormTemplateField>(&query)
            .bind(template_id)
            .fetch_all(exec)
            .await
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub struct FormResponseRepo;

impl FormResponseRepo {
    pub async fn create<'e, E: PgExecutor<'e>>(
        exec: E,
        card_id: DbId,
        template_id: Option<DbId>,
        status: FormResponseStatus,
    ) -> Result<FormResponse, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_responses (card_id, template_id, status) VALUES ($1, $2, $3)
             RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(card_id)
            .bind(template_id)
            .bind(status.as_str())
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_card<'e, E: PgExecutor<'e>>(
        exec: E,
        card_id: DbId,
    ) -> Result<Option<FormResponse>, sqlx::Error> {
        let query = format!("SELECT {RESPONSE_COLUMNS} FROM form_responses WHERE card_id = $1");
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(card_id)
            .fetch_optional(exec)
            .await
    }

    pub async fn set_status<'e, E: PgExecutor<'e>>(
        exec: E,
        id: DbId,
        status: FormResponseStatus,
    ) -> Result<FormResponse, sqlx::Error> {
        let query = format!(
            "UPDATE form_responses SET status = $2 WHERE id = $1 RETURNING {RESPONSE_COLUMNS}"
        );
        sqlx::query_as::<_, FormResponse>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(exec)
            .await
    }

    /// Ids of the responses owned by the given cards.
    pub async fn ids_by_cards<'e, E: PgExecutor<'e>>(
        exec: E,
        card_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if card_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT id FROM form_responses WHERE card_id = ANY($1)")
            .bind(card_ids)
            .fetch_all(exec)
            .await
    }

    pub async fn delete_by_ids<'e, E: PgExecutor<'e>>(
        exec: E,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM form_responses WHERE id = ANY($1)")
            .bind(ids)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

pub struct FormAnswerRepo;

impl FormAnswerRepo {
    pub async fn list_by_response<'e, E: PgExecutor<'e>>(
        exec: E,
        response_id: DbId,
    ) -> Result<Vec<FormAnswer>, sqlx::Error> {
        let query = format!(
            "SELECT {ANSWER_COLUMNS} FROM form_answers WHERE response_id = $1 ORDER BY field_id"
        );
        sqlx::query_as::<_, FormAnswer>(&query)
            .bind(response_id)
            .fetch_all(exec)
            .await
    }

    /// Remove any prior answer for one field of a response.
    pub async fn delete_for_field<'e, E: PgExecutor<'e>>(
        exec: E,
        response_id: DbId,
        field_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_answers WHERE response_id = $1 AND field_id = $2")
            .bind(response_id)
            .bind(field_id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(
        exec: E,
        response_id: DbId,
        field_id: DbId,
        value: &AnswerValue,
    ) -> Result<FormAnswer, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_answers (response_id, field_id, value) VALUES ($1, $2, $3)
             RETURNING {ANSWER_COLUMNS}"
        );
        sqlx::query_as::<_, FormAnswer>(&query)
            .bind(response_id)
            .bind(field_id)
            .bind(Json(value))
            .fetch_one(exec)
            .await
    }

    /// Delete every answer belonging to the given responses.
    pub async fn delete_by_responses<'e, E: PgExecutor<'e>>(
        exec: E,
        response_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if response_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM form_answers WHERE response_id = ANY($1)")
            .bind(response_ids)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }
}
