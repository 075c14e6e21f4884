//! Form template field typing and card form submission rules.
//!
//! Field kinds and answer payloads are closed enums, so checking an answer
//! against its field is an exhaustive match rather than string comparison.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::macros::define_text_enum;
use crate::types::DbId;

define_text_enum! {
    /// Fill-in status of a card's form response.
    FormResponseStatus {
        NotStarted = "not_started",
        InProgress = "in_progress",
        Complete = "complete",
    }
}

/// The input kind of a template field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Date,
    Checkbox,
    /// Multiple choice restricted to `options`.
    List { options: Vec<String> },
    File,
    /// Free-text reference to a client record.
    Client,
}

/// A file attached to a `file` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub url: String,
}

/// The typed payload of one answer. Exactly one shape per field kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
    List(Vec<String>),
    Attachments(Vec<Attachment>),
}

impl AnswerValue {
    /// Whether the answer carries no content (empty text, list, or attachments).
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Text(s) => s.trim().is_empty(),
            AnswerValue::List(items) => items.is_empty(),
            AnswerValue::Attachments(files) => files.is_empty(),
            AnswerValue::Number(_) | AnswerValue::Date(_) | AnswerValue::Bool(_) => false,
        }
    }
}

/// A template field as seen by submission validation.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub id: DbId,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// One incoming answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub field_id: DbId,
    pub value: AnswerValue,
}

// ---------------------------------------------------------------------------
// Template validation
// ---------------------------------------------------------------------------

/// Validate a field kind when a template is created.
///
/// `list` fields need at least one option and no duplicate options.
pub fn validate_field_kind(kind: &FieldKind) -> Result<(), String> {
    let FieldKind::List { options } = kind else {
        return Ok(());
    };
    if options.is_empty() {
        return Err("List fields need at least one option".to_string());
    }
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err("List options must not be blank".to_string());
        }
        if !seen.insert(option.as_str()) {
            return Err(format!("Duplicate list option '{option}'"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Answer validation
// ---------------------------------------------------------------------------

/// Check that `value` has the shape required by `kind`.
pub fn validate_answer(kind: &FieldKind, value: &AnswerValue) -> Result<(), String> {
    match (kind, value) {
        (FieldKind::Text | FieldKind::LongText | FieldKind::Client, AnswerValue::Text(_)) => Ok(()),
        (FieldKind::Number, AnswerValue::Number(n)) => {
            if n.is_finite() {
                Ok(())
            } else {
                Err("Number answers must be finite".to_string())
            }
        }
        (FieldKind::Date, AnswerValue::Date(_)) => Ok(()),
        (FieldKind::Checkbox, AnswerValue::Bool(_)) => Ok(()),
        (FieldKind::List { options }, AnswerValue::List(selected)) => {
            match selected.iter().find(|s| !options.contains(s)) {
                Some(bad) => Err(format!("'{bad}' is not one of the allowed options")),
                None => Ok(()),
            }
        }
        (FieldKind::File, AnswerValue::Attachments(files)) => {
            if files.iter().any(|f| f.url.trim().is_empty()) {
                Err("Attachments need a url".to_string())
            } else {
                Ok(())
            }
        }
        (kind, value) => Err(format!(
            "{} answer does not fit a {} field",
            answer_type_name(value),
            field_kind_name(kind)
        )),
    }
}

fn answer_type_name(value: &AnswerValue) -> &'static str {
    match value {
        AnswerValue::Text(_) => "text",
        AnswerValue::Number(_) => "number",
        AnswerValue::Date(_) => "date",
        AnswerValue::Bool(_) => "bool",
        AnswerValue::List(_) => "list",
        AnswerValue::Attachments(_) => "attachments",
    }
}

/// The wire tag of a field kind.
pub fn field_kind_name(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::LongText => "long_text",
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::Checkbox => "checkbox",
        FieldKind::List { .. } => "list",
        FieldKind::File => "file",
        FieldKind::Client => "client",
    }
}

/// Validate a card form submission and return the answers to persist.
///
/// - Every answer must target a field of the template and fit its kind.
/// - Repeated field ids within one submission collapse to the last one.
/// - Submitting with status `complete` requires every required field to
///   have a non-blank answer, counting both `previously_answered` fields
///   (stored with a non-blank value, not being replaced) and this submission.
///
/// The returned answers are ordered by first appearance of their field id.
pub fn prepare_submission(
    fields: &[FieldDefinition],
    previously_answered: &HashSet<DbId>,
    status: FormResponseStatus,
    answers: Vec<SubmittedAnswer>,
) -> Result<Vec<SubmittedAnswer>, CoreError> {
    let by_id: HashMap<DbId, &FieldDefinition> = fields.iter().map(|f| (f.id, f)).collect();

    let mut order: Vec<DbId> = Vec::new();
    let mut latest: HashMap<DbId, SubmittedAnswer> = HashMap::new();
    for answer in answers {
        let field = by_id.get(&answer.field_id).ok_or_else(|| {
            CoreError::Validation(format!(
                "Field {} is not part of this form's template",
                answer.field_id
            ))
        })?;
        validate_answer(&field.kind, &answer.value)
            .map_err(|e| CoreError::Validation(format!("Field '{}': {e}", field.label)))?;
        if !latest.contains_key(&answer.field_id) {
            order.push(answer.field_id);
        }
        latest.insert(answer.field_id, answer);
    }

    if status == FormResponseStatus::Complete {
        let missing: Vec<&str> = fields
            .iter()
            .filter(|f| f.required)
            .filter(|f| match latest.get(&f.id) {
                Some(answer) => answer.value.is_blank(),
                None => !previously_answered.contains(&f.id),
            })
            .map(|f| f.label.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Cannot complete form; required fields unanswered: {}",
                missing.join(", ")
            )));
        }
    }

    Ok(order
        .into_iter()
        .filter_map(|id| latest.remove(&id))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn field(id: DbId, label: &str, kind: FieldKind, required: bool) -> FieldDefinition {
        FieldDefinition {
            id,
            label: label.to_string(),
            kind,
            required,
        }
    }

    fn template() -> Vec<FieldDefinition> {
        vec![
            field(1, "Observações", FieldKind::LongText, false),
            field(2, "Horas", FieldKind::Number, true),
            field(
                3,
                "Equipamentos",
                FieldKind::List {
                    options: vec!["Inversor".into(), "Painel".into()],
                },
                false,
            ),
            field(4, "Vistoria", FieldKind::Checkbox, true),
        ]
    }

    fn answer(field_id: DbId, value: AnswerValue) -> SubmittedAnswer {
        SubmittedAnswer { field_id, value }
    }

    // -- validate_answer -------------------------------------------------

    #[test]
    fn text_kinds_accept_text() {
        for kind in [FieldKind::Text, FieldKind::LongText, FieldKind::Client] {
            assert!(validate_answer(&kind, &AnswerValue::Text("x".into())).is_ok());
        }
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let err = validate_answer(&FieldKind::Date, &AnswerValue::Bool(true)).unwrap_err();
        assert!(err.contains("bool"));
        assert!(err.contains("date"));
    }

    #[test]
    fn nan_number_is_rejected() {
        assert!(validate_answer(&FieldKind::Number, &AnswerValue::Number(f64::NAN)).is_err());
        assert!(validate_answer(&FieldKind::Number, &AnswerValue::Number(2.5)).is_ok());
    }

    #[test]
    fn list_answer_must_use_known_options() {
        let kind = FieldKind::List {
            options: vec!["a".into(), "b".into()],
        };
        assert!(validate_answer(&kind, &AnswerValue::List(vec!["a".into()])).is_ok());
        assert!(validate_answer(&kind, &AnswerValue::List(vec!["c".into()])).is_err());
    }

    #[test]
    fn file_answer_needs_urls() {
        let ok = AnswerValue::Attachments(vec![Attachment {
            name: "laudo.pdf".into(),
            url: "https://files.example/laudo.pdf".into(),
        }]);
        let bad = AnswerValue::Attachments(vec![Attachment {
            name: "laudo.pdf".into(),
            url: " ".into(),
        }]);
        assert!(validate_answer(&FieldKind::File, &ok).is_ok());
        assert!(validate_answer(&FieldKind::File, &bad).is_err());
    }

    // -- validate_field_kind ---------------------------------------------

    #[test]
    fn list_kind_requires_unique_options() {
        assert!(validate_field_kind(&FieldKind::List { options: vec![] }).is_err());
        assert!(validate_field_kind(&FieldKind::List {
            options: vec!["a".into(), "a".into()]
        })
        .is_err());
        assert!(validate_field_kind(&FieldKind::List {
            options: vec!["a".into(), "b".into()]
        })
        .is_ok());
        assert!(validate_field_kind(&FieldKind::Number).is_ok());
    }

    // -- prepare_submission ----------------------------------------------

    #[test]
    fn duplicate_field_ids_collapse_to_last() {
        let answers = vec![
            answer(2, AnswerValue::Number(1.0)),
            answer(1, AnswerValue::Text("first".into())),
            answer(2, AnswerValue::Number(8.0)),
        ];
        let prepared = prepare_submission(
            &template(),
            &HashSet::new(),
            FormResponseStatus::InProgress,
            answers,
        )
        .unwrap();
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0], answer(2, AnswerValue::Number(8.0)));
        assert_eq!(prepared[1].field_id, 1);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = prepare_submission(
            &template(),
            &HashSet::new(),
            FormResponseStatus::InProgress,
            vec![answer(99, AnswerValue::Text("x".into()))],
        );
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("99"));
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let result = prepare_submission(
            &template(),
            &HashSet::new(),
            FormResponseStatus::InProgress,
            vec![answer(2, AnswerValue::Text("eight".into()))],
        );
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Horas"));
    }

    #[test]
    fn complete_requires_required_fields() {
        let result = prepare_submission(
            &template(),
            &HashSet::new(),
            FormResponseStatus::Complete,
            vec![answer(2, AnswerValue::Number(4.0))],
        );
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Vistoria"));
    }

    #[test]
    fn complete_counts_previous_answers() {
        let previous: HashSet<DbId> = [4].into_iter().collect();
        let result = prepare_submission(
            &template(),
            &previous,
            FormResponseStatus::Complete,
            vec![answer(2, AnswerValue::Number(4.0))],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn blank_answer_does_not_satisfy_required() {
        let fields = vec![field(1, "Resumo", FieldKind::Text, true)];
        let previous: HashSet<DbId> = [1].into_iter().collect();
        let result = prepare_submission(
            &fields,
            &previous,
            FormResponseStatus::Complete,
            vec![answer(1, AnswerValue::Text("   ".into()))],
        );
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[test]
    fn in_progress_allows_missing_required() {
        let result = prepare_submission(
            &template(),
            &HashSet::new(),
            FormResponseStatus::InProgress,
            vec![],
        );
        assert_eq!(result.unwrap(), vec![]);
    }

    // -- serde -----------------------------------------------------------

    #[test]
    fn field_kind_uses_kind_tag() {
        let json = serde_json::to_value(FieldKind::List {
            options: vec!["a".into()],
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "list", "options": ["a"]}));
        let parsed: FieldKind = serde_json::from_value(serde_json::json!({"kind": "long_text"}))
            .unwrap();
        assert_eq!(parsed, FieldKind::LongText);
    }

    #[test]
    fn answer_value_uses_type_and_value() {
        let parsed: AnswerValue =
            serde_json::from_value(serde_json::json!({"type": "date", "value": "2026-10-19"}))
                .unwrap();
        assert_eq!(
            parsed,
            AnswerValue::Date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
        );
    }
}
