//! Stage writes for polo projects, each followed by a progress recompute.

use crmboard_core::error::CoreError;
use crmboard_core::gantt::{
    compute_overall_progress, validate_stage_dates, validate_stage_hierarchy, StageLevel,
};
use crmboard_core::types::DbId;
use crmboard_db::models::polo::{PoloStage, StageInput};
use crmboard_db::repositories::{PoloProjectRepo, StageRepo};
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;

pub async fn create_stage(
    pool: &PgPool,
    polo_project_id: DbId,
    input: &StageInput,
) -> AppResult<PoloStage> {
    validate_stage_hierarchy(input.level, input.parent_stage_id)?;
    validate_stage_dates(input.starts_at, input.ends_at)?;

    let mut tx = pool.begin().await?;

    ensure_project(&mut tx, polo_project_id).await?;
    if let Some(parent_id) = input.parent_stage_id {
        ensure_top_level_parent(&mut tx, polo_project_id, parent_id).await?;
    }

    let stage = StageRepo::create(&mut *tx, polo_project_id, input).await?;
    let progress = recompute_progress(&mut tx, polo_project_id).await?;

    tx.commit().await?;

    tracing::info!(
        polo_project_id,
        stage_id = stage.id,
        level = i16::from(stage.level),
        progress,
        "Stage created"
    );
    Ok(stage)
}

/// Replace a stage's fields.
pub async fn update_stage(
    pool: &PgPool,
    polo_project_id: DbId,
    stage_id: DbId,
    input: &StageInput,
) -> AppResult<PoloStage> {
    validate_stage_hierarchy(input.level, input.parent_stage_id)?;
    validate_stage_dates(input.starts_at, input.ends_at)?;
    if input.parent_stage_id == Some(stage_id) {
        return Err(CoreError::Validation("A stage cannot be its own parent".into()).into());
    }

    let mut tx = pool.begin().await?;

    let existing = find_stage(&mut tx, polo_project_id, stage_id).await?;
    if let Some(parent_id) = input.parent_stage_id {
        ensure_top_level_parent(&mut tx, polo_project_id, parent_id).await?;
    }
    if existing.level == StageLevel::Top && input.level == StageLevel::Sub {
        let children = StageRepo::count_children(&mut *tx, stage_id).await?;
        if children > 0 {
            return Err(CoreError::ConstraintViolation(format!(
                "Stage '{}' has {children} sub-stage(s) and cannot become a sub-stage",
                existing.name
            ))
            .into());
        }
    }

    let stage = StageRepo::replace(&mut *tx, stage_id, input).await?;
    let progress = recompute_progress(&mut tx, polo_project_id).await?;

    tx.commit().await?;

    tracing::info!(polo_project_id, stage_id, progress, "Stage updated");
    Ok(stage)
}

/// Delete a stage. A top-level stage with sub-stages is refused.
pub async fn delete_stage(pool: &PgPool, polo_project_id: DbId, stage_id: DbId) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    let stage = find_stage(&mut tx, polo_project_id, stage_id).await?;
    if stage.level == StageLevel::Top {
        let children = StageRepo::count_children(&mut *tx, stage_id).await?;
        if children > 0 {
            return Err(CoreError::ConstraintViolation(format!(
                "Stage '{}' has {children} sub-stage(s)",
                stage.name
            ))
            .into());
        }
    }

    StageRepo::delete(&mut *tx, stage_id).await?;
    let progress = recompute_progress(&mut tx, polo_project_id).await?;

    tx.commit().await?;

    tracing::info!(polo_project_id, stage_id, progress, "Stage deleted");
    Ok(())
}

pub async fn set_stage_completion(
    pool: &PgPool,
    polo_project_id: DbId,
    stage_id: DbId,
    completed: bool,
) -> AppResult<PoloStage> {
    let mut tx = pool.begin().await?;

    find_stage(&mut tx, polo_project_id, stage_id).await?;
    let stage = StageRepo::set_completed(&mut *tx, stage_id, completed).await?;
    let progress = recompute_progress(&mut tx, polo_project_id).await?;

    tx.commit().await?;

    tracing::info!(polo_project_id, stage_id, completed, progress, "Stage completion set");
    Ok(stage)
}

/// Recompute and store a polo project's overall progress.
async fn recompute_progress(conn: &mut PgConnection, polo_project_id: DbId) -> AppResult<i32> {
    let (completed, total) = StageRepo::completion_counts(&mut *conn, polo_project_id).await?;
    let progress = compute_overall_progress(completed, total);
    PoloProjectRepo::set_progress(&mut *conn, polo_project_id, progress).await?;
    Ok(progress)
}

async fn ensure_project(conn: &mut PgConnection, polo_project_id: DbId) -> AppResult<()> {
    PoloProjectRepo::find_by_id(&mut *conn, polo_project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "PoloProject",
            id: polo_project_id,
        })?;
    Ok(())
}

async fn find_stage(
    conn: &mut PgConnection,
    polo_project_id: DbId,
    stage_id: DbId,
) -> AppResult<PoloStage> {
    ensure_project(conn, polo_project_id).await?;
    let stage = StageRepo::find_in_project(&mut *conn, polo_project_id, stage_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Stage",
            id: stage_id,
        })?;
    Ok(stage)
}

/// The parent of a sub-stage must be a top-level stage of the same project.
async fn ensure_top_level_parent(
    conn: &mut PgConnection,
    polo_project_id: DbId,
    parent_id: DbId,
) -> AppResult<()> {
    let parent = StageRepo::find_in_project(&mut *conn, polo_project_id, parent_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Parent stage {parent_id} is not a stage of polo project {polo_project_id}"
            ))
        })?;
    if parent.level != StageLevel::Top {
        return Err(CoreError::Validation(format!(
            "Parent stage {parent_id} is not a level 1 stage"
        ))
        .into());
    }
    Ok(())
}
