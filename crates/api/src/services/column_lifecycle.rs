//! Column edits that touch the cards inside them.

use std::collections::HashSet;

use crmboard_core::board::{column_status_sync, ColumnStatusSync};
use crmboard_core::error::CoreError;
use crmboard_core::types::{DbId, Timestamp};
use crmboard_db::models::column::{BoardColumn, UpdateColumn};
use crmboard_db::repositories::{CardRepo, ColumnRepo, ProjectRepo};
use sqlx::PgPool;

use crate::error::AppResult;

/// Update a column. A status change re-applies the completion policy to
/// every card in the column within the same transaction.
pub async fn update_column(
    pool: &PgPool,
    column_id: DbId,
    input: &UpdateColumn,
    now: Timestamp,
) -> AppResult<BoardColumn> {
    let mut tx = pool.begin().await?;

    let existing = ColumnRepo::find_by_id(&mut *tx, column_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: column_id,
        })?;
    let column = ColumnRepo::update(&mut *tx, column_id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Column",
            id: column_id,
        })?;

    let sync = column_status_sync(existing.status, column.status);
    let cards_changed = match sync {
        ColumnStatusSync::StampMissing => {
            CardRepo::stamp_missing_completion(&mut *tx, column_id, now).await?
        }
        ColumnStatusSync::ClearAll => CardRepo::clear_completion(&mut *tx, column_id).await?,
        ColumnStatusSync::Unchanged => 0,
    };

    tx.commit().await?;

    tracing::info!(
        column_id,
        old_status = %existing.status,
        new_status = %column.status,
        ?sync,
        cards_changed,
        "Column updated"
    );
    Ok(column)
}

/// Rewrite the display order of a project's columns.
///
/// `column_ids` must list every column of the project exactly once; the
/// position in the list becomes the new `sort_order`.
pub async fn reorder_columns(
    pool: &PgPool,
    project_id: DbId,
    column_ids: &[DbId],
) -> AppResult<Vec<BoardColumn>> {
    let mut tx = pool.begin().await?;

    ProjectRepo::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

    let current: HashSet<DbId> = ColumnRepo::list_by_project(&mut *tx, project_id)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    let requested: HashSet<DbId> = column_ids.iter().copied().collect();
    if requested.len() != column_ids.len() {
        return Err(CoreError::Validation("Column order contains duplicate ids".into()).into());
    }
    if let Some(foreign) = column_ids.iter().find(|id| !current.contains(id)) {
        return Err(CoreError::Validation(format!(
            "Column {foreign} does not belong to project {project_id}"
        ))
        .into());
    }
    if requested.len() != current.len() {
        return Err(CoreError::Validation(format!(
            "Column order must list all {} columns of the project",
            current.len()
        ))
        .into());
    }

    for (index, &id) in column_ids.iter().enumerate() {
        ColumnRepo::set_sort_order(&mut *tx, id, project_id, index as i32).await?;
    }
    let columns = ColumnRepo::list_by_project(&mut *tx, project_id).await?;

    tx.commit().await?;

    tracing::info!(project_id, columns = columns.len(), "Columns reordered");
    Ok(columns)
}
