//! Form templates, per-card form responses, and answers.

use crmboard_core::forms::{AnswerValue, FieldDefinition, FieldKind, FormResponseStatus, SubmittedAnswer};
use crmboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A row from the `form_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormTemplate {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `form_template_fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormTemplateField {
    pub id: DbId,
    pub template_id: DbId,
    pub label: String,
    #[serde(flatten)]
    pub kind: Json<FieldKind>,
    pub required: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
}

impl From<&FormTemplateField> for FieldDefinition {
    fn from(field: &FormTemplateField) -> Self {
        FieldDefinition {
            id: field.id,
            label: field.label.clone(),
            kind: field.kind.0.clone(),
            required: field.required,
        }
    }
}

/// A template together with its ordered fields.
#[derive(Debug, Clone, Serialize)]
pub struct FormTemplateWithFields {
    #[serde(flatten)]
    pub template: FormTemplate,
    pub fields: Vec<FormTemplateField>,
}

/// DTO for one field of a new template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplateField {
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
}

/// DTO for creating a template. Field order follows the list order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFormTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub fields: Vec<CreateTemplateField>,
}

// ---------------------------------------------------------------------------
// Responses and answers
// ---------------------------------------------------------------------------

/// A row from the `form_responses` table. One per card.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormResponse {
    pub id: DbId,
    pub card_id: DbId,
    pub template_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: FormResponseStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `form_answers` table. At most one per (response, field).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormAnswer {
    pub id: DbId,
    pub response_id: DbId,
    pub field_id: DbId,
    pub value: Json<AnswerValue>,
    pub created_at: Timestamp,
}

/// DTO for `POST /cards/{id}/form`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitCardForm {
    pub status: FormResponseStatus,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
}

/// Everything needed to render a card's form.
#[derive(Debug, Clone, Serialize)]
pub struct CardFormView {
    pub response: FormResponse,
    pub fields: Vec<FormTemplateField>,
    pub answers: Vec<FormAnswer>,
}
