//! Ordered deletion of parents and their dependents.
//!
//! Foreign keys carry no `ON DELETE CASCADE`, so dependents are removed
//! child-first inside one transaction. A failure at any step rolls the
//! whole delete back.

use crmboard_core::error::CoreError;
use crmboard_core::gantt::StageLevel;
use crmboard_core::types::DbId;
use crmboard_db::repositories::{
    AlertRepo, CardRepo, ColumnRepo, FormAnswerRepo, FormResponseRepo, FunnelColumnRepo,
    PoloProjectRepo, ProjectRepo, StageRepo,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Rows removed by a project delete, per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub alerts: u64,
    pub form_answers: u64,
    pub form_responses: u64,
    pub cards: u64,
    pub columns: u64,
}

/// Delete a project and everything under it.
///
/// Order: alerts, form answers, form responses, cards, columns, project.
pub async fn delete_project(pool: &PgPool, project_id: DbId) -> AppResult<CascadeReport> {
    let mut tx = pool.begin().await?;

    ProjectRepo::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

    let mut report = CascadeReport {
        alerts: AlertRepo::delete_by_project(&mut *tx, project_id).await?,
        ..CascadeReport::default()
    };

    let card_ids = CardRepo::ids_by_project(&mut *tx, project_id).await?;
    let response_ids = FormResponseRepo::ids_by_cards(&mut *tx, &card_ids).await?;
    report.form_answers = FormAnswerRepo::delete_by_responses(&mut *tx, &response_ids).await?;
    report.form_responses = FormResponseRepo::delete_by_ids(&mut *tx, &response_ids).await?;
    report.cards = CardRepo::delete_by_ids(&mut *tx, &card_ids).await?;
    report.columns = ColumnRepo::delete_by_project(&mut *tx, project_id).await?;
    ProjectRepo::delete(&mut *tx, project_id).await?;

    tx.commit().await?;

    tracing::info!(
        project_id,
        alerts = report.alerts,
        form_answers = report.form_answers,
        form_responses = report.form_responses,
        cards = report.cards,
        columns = report.columns,
        "Project deleted"
    );
    Ok(report)
}

/// Delete a board column. Refused while any card sits in it.
pub async fn delete_column(pool: &PgPool, column_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let column = ColumnRepo::find_by_id(&mut *tx, column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: column_id,
        })?;
    let cards = ColumnRepo::count_cards(&mut *tx, column_id).await?;
    if cards > 0 {
        return Err(CoreError::ConstraintViolation(format!(
            "Column '{}' still has {cards} card(s)",
            column.name
        ))
        .into());
    }
    ColumnRepo::delete(&mut *tx, column_id).await?;

    tx.commit().await?;

    tracing::info!(column_id, project_id = column.project_id, "Column deleted");
    Ok(())
}

/// Delete a sales funnel column. Refused while any deal card sits in it.
pub async fn delete_funnel_column(pool: &PgPool, column_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let column = FunnelColumnRepo::find_by_id(&mut *tx, column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "FunnelColumn",
            id: column_id,
        })?;
    let cards = FunnelColumnRepo::count_cards(&mut *tx, column_id).await?;
    if cards > 0 {
        return Err(CoreError::ConstraintViolation(format!(
            "Funnel column '{}' still has {cards} card(s)",
            column.name
        ))
        .into());
    }
    FunnelColumnRepo::delete(&mut *tx, column_id).await?;

    tx.commit().await?;

    tracing::info!(column_id, "Funnel column deleted");
    Ok(())
}

/// Delete a polo project: sub-stages, then top-level stages, then the project.
pub async fn delete_polo_project(pool: &PgPool, polo_project_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    PoloProjectRepo::find_by_id(&mut *tx, polo_project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PoloProject",
            id: polo_project_id,
        })?;

    let sub_stages =
        StageRepo::delete_by_project_level(&mut *tx, polo_project_id, StageLevel::Sub).await?;
    let top_stages =
        StageRepo::delete_by_project_level(&mut *tx, polo_project_id, StageLevel::Top).await?;
    PoloProjectRepo::delete(&mut *tx, polo_project_id).await?;

    tx.commit().await?;

    tracing::info!(polo_project_id, sub_stages, top_stages, "Polo project deleted");
    Ok(())
}
