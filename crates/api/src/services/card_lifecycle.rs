//! Card creation, moves, edits, form submission, and deletion.

use std::collections::HashSet;

use crmboard_core::board::{resolve_completion_date, validate_card_dates, ColumnStatus};
use crmboard_core::error::CoreError;
use crmboard_core::forms::{prepare_submission, FieldDefinition, FormResponseStatus};
use crmboard_core::types::{DbId, Timestamp};
use crmboard_db::models::card::{Card, CreateCard, UpdateCard};
use crmboard_db::models::form::{CardFormView, FormResponse, SubmitCardForm};
use crmboard_db::repositories::{
    AlertRepo, CardRepo, ColumnRepo, FormAnswerRepo, FormResponseRepo, FormTemplateRepo,
    ProjectRepo, UserRepo,
};
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;

/// Create a card and provision its form response against the project's
/// default template.
///
/// A card created directly in a completed column is stamped as if it had
/// just moved there from an open column.
pub async fn create_card(pool: &PgPool, input: &CreateCard, now: Timestamp) -> AppResult<Card> {
    validate_card_dates(input.start_date, input.due_date)?;

    let mut tx = pool.begin().await?;

    let project = ProjectRepo::find_by_id(&mut *tx, input.project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        })?;
    let column = ColumnRepo::find_by_id(&mut *tx, input.column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: input.column_id,
        })?;
    if column.project_id != project.id {
        return Err(CoreError::Validation(format!(
            "Column {} does not belong to project {}",
            column.id, project.id
        ))
        .into());
    }

    // A supplied date only survives into a completed column.
    let supplied = input
        .completion_date
        .filter(|_| column.status.is_completed());
    let completion_date =
        resolve_completion_date(ColumnStatus::Open, column.status, supplied, now);
    let card = CardRepo::create(&mut *tx, input, completion_date).await?;
    let response = FormResponseRepo::create(
        &mut *tx,
        card.id,
        project.default_template_id,
        FormResponseStatus::NotStarted,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        card_id = card.id,
        project_id = project.id,
        column_id = column.id,
        form_response_id = response.id,
        completed = card.completion_date.is_some(),
        "Card created"
    );
    Ok(card)
}

/// Move a card to another column of the same project, applying the
/// completion policy.
///
/// The card row is locked for the duration of the transaction, so
/// concurrent moves of one card serialize and the last one wins.
pub async fn move_card(
    pool: &PgPool,
    card_id: DbId,
    target_column_id: DbId,
    now: Timestamp,
) -> AppResult<Card> {
    let mut tx = pool.begin().await?;

    let card = CardRepo::find_for_update(&mut *tx, card_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
    let target = ColumnRepo::find_by_id(&mut *tx, target_column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: target_column_id,
        })?;
    if target.project_id != card.project_id {
        return Err(CoreError::Validation(format!(
            "Column {} belongs to another project than card {}",
            target.id, card.id
        ))
        .into());
    }
    let source = ColumnRepo::find_by_id(&mut *tx, card.column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: card.column_id,
        })?;

    let completion_date =
        resolve_completion_date(source.status, target.status, card.completion_date, now);
    let moved = CardRepo::set_column(&mut *tx, card.id, target.id, completion_date).await?;

    tx.commit().await?;

    tracing::info!(
        card_id = moved.id,
        from_column_id = source.id,
        to_column_id = target.id,
        completion_changed = card.completion_date != moved.completion_date,
        "Card moved"
    );
    Ok(moved)
}

/// Update a card's own fields. Date ordering is checked against the merged
/// result.
pub async fn update_card(pool: &PgPool, card_id: DbId, input: &UpdateCard) -> AppResult<Card> {
    let mut tx = pool.begin().await?;

    let existing = CardRepo::find_for_update(&mut *tx, card_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
    validate_card_dates(
        input.start_date.or(existing.start_date),
        input.due_date.or(existing.due_date),
    )?;

    let card = CardRepo::update(&mut *tx, card_id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;

    tx.commit().await?;
    Ok(card)
}

/// Read a card's form: template fields, response status, and answers.
pub async fn card_form(pool: &PgPool, card_id: DbId) -> AppResult<CardFormView> {
    let mut conn = pool.acquire().await?;

    CardRepo::find_by_id(&mut *conn, card_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;
    let response = FormResponseRepo::find_by_card(&mut *conn, card_id)
        .await?
        .ok_or_else(|| {
            CoreError::Internal(format!("Card {card_id} has no form response"))
        })?;

    load_form_view(&mut *conn, response).await
}

/// Submit answers for a card's form.
///
/// Each answer replaces any stored answer for the same field. A missing
/// form response is recreated against the project's default template.
pub async fn submit_card_form(
    pool: &PgPool,
    card_id: DbId,
    input: SubmitCardForm,
) -> AppResult<CardFormView> {
    let mut tx = pool.begin().await?;

    let card = CardRepo::find_by_id(&mut *tx, card_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;

    let response = match FormResponseRepo::find_by_card(&mut *tx, card_id).await? {
        Some(response) => response,
        None => {
            let template_id = ProjectRepo::find_by_id(&mut *tx, card.project_id)
                .await?
                .and_then(|p| p.default_template_id);
            tracing::warn!(card_id, ?template_id, "Card had no form response; recreating");
            FormResponseRepo::create(&mut *tx, card_id, template_id, FormResponseStatus::NotStarted)
                .await?
        }
    };

    let fields = match response.template_id {
        Some(template_id) => FormTemplateRepo::fields(&mut *tx, template_id).await?,
        None => Vec::new(),
    };
    let definitions: Vec<FieldDefinition> = fields.iter().map(FieldDefinition::from).collect();
    let previously_answered: HashSet<DbId> =
        FormAnswerRepo::list_by_response(&mut *tx, response.id)
            .await?
            .into_iter()
            .filter(|stored| !stored.value.0.is_blank())
            .map(|stored| stored.field_id)
            .collect();

    let answers = prepare_submission(
        &definitions,
        &previously_answered,
        input.status,
        input.answers,
    )?;

    for answer in &answers {
        FormAnswerRepo::delete_for_field(&mut *tx, response.id, answer.field_id).await?;
        FormAnswerRepo::insert(&mut *tx, response.id, answer.field_id, &answer.value).await?;
    }
    let response = FormResponseRepo::set_status(&mut *tx, response.id, input.status).await?;

    let view = load_form_view(&mut *tx, response).await?;
    tx.commit().await?;

    tracing::info!(
        card_id,
        form_response_id = view.response.id,
        status = %view.response.status,
        answers_written = answers.len(),
        "Card form submitted"
    );
    Ok(view)
}

/// Delete a card with its form response and answers.
///
/// Only roles allowed by [`Role::can_delete_cards`] may delete; the role is
/// read from storage, not from the token.
///
/// [`Role::can_delete_cards`]: crmboard_core::roles::Role::can_delete_cards
pub async fn delete_card(pool: &PgPool, card_id: DbId, acting_user_id: DbId) -> AppResult<()> {
    let role = UserRepo::find_role(pool, acting_user_id)
        .await?
        .ok_or_else(|| {
            CoreError::PermissionDenied(format!("User {acting_user_id} is not registered"))
        })?;
    if !role.can_delete_cards() {
        return Err(CoreError::PermissionDenied(format!("Role '{role}' may not delete cards")).into());
    }

    let mut tx = pool.begin().await?;

    CardRepo::find_for_update(&mut *tx, card_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Card",
            id: card_id,
        })?;

    let response_ids = FormResponseRepo::ids_by_cards(&mut *tx, &[card_id]).await?;
    let answers = FormAnswerRepo::delete_by_responses(&mut *tx, &response_ids).await?;
    let responses = FormResponseRepo::delete_by_ids(&mut *tx, &response_ids).await?;
    let alerts = AlertRepo::detach_card(&mut *tx, card_id).await?;
    CardRepo::delete(&mut *tx, card_id).await?;

    tx.commit().await?;

    tracing::info!(
        card_id,
        acting_user_id,
        %role,
        form_answers = answers,
        form_responses = responses,
        alerts_detached = alerts,
        "Card deleted"
    );
    Ok(())
}

async fn load_form_view(conn: &mut PgConnection, response: FormResponse) -> AppResult<CardFormView> {
    let fields = match response.template_id {
        Some(template_id) => FormTemplateRepo::fields(&mut *conn, template_id).await?,
        None => Vec::new(),
    };
    let answers = FormAnswerRepo::list_by_response(&mut *conn, response.id).await?;
    Ok(CardFormView {
        response,
        fields,
        answers,
    })
}
