//! Kanban board rules: project/column/card status tags and the column
//! completion policy that keeps a card's completion date consistent with
//! the column it sits in.

use crate::error::CoreError;
use crate::macros::define_text_enum;
use crate::types::Timestamp;

define_text_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Active = "active",
        Paused = "paused",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

define_text_enum! {
    /// Status tag on a board column. Independent of the column's display order.
    ColumnStatus {
        Open = "open",
        Paused = "paused",
        Completed = "completed",
    }
}

define_text_enum! {
    /// Card priority.
    CardPriority {
        Low = "low",
        Medium = "medium",
        High = "high",
        Urgent = "urgent",
    }
}

define_text_enum! {
    /// Alert severity.
    AlertSeverity {
        Info = "info",
        Warning = "warning",
        Critical = "critical",
    }
}

impl ColumnStatus {
    pub fn is_completed(self) -> bool {
        self == ColumnStatus::Completed
    }
}

// ---------------------------------------------------------------------------
// Default column set
// ---------------------------------------------------------------------------

/// A column inserted for every new project.
#[derive(Debug, Clone, Copy)]
pub struct DefaultColumn {
    pub name: &'static str,
    pub status: ColumnStatus,
    pub color: &'static str,
}

/// Columns created with every project, in display order (`order` = index).
pub const DEFAULT_COLUMNS: &[DefaultColumn] = &[
    DefaultColumn {
        name: "A Fazer",
        status: ColumnStatus::Open,
        color: "#94a3b8",
    },
    DefaultColumn {
        name: "Em Andamento",
        status: ColumnStatus::Open,
        color: "#3b82f6",
    },
    DefaultColumn {
        name: "Concluído",
        status: ColumnStatus::Completed,
        color: "#22c55e",
    },
];

// ---------------------------------------------------------------------------
// Completion policy
// ---------------------------------------------------------------------------

/// Compute a card's completion date after it moves from a column with
/// status `from` into a column with status `to`.
///
/// - Into `Completed`: keep `supplied` if present, otherwise stamp `now`.
/// - Out of `Completed` into anything else: cleared.
/// - Otherwise: `supplied` is returned untouched.
///
/// Creation is modelled as a move from [`ColumnStatus::Open`].
pub fn resolve_completion_date(
    from: ColumnStatus,
    to: ColumnStatus,
    supplied: Option<Timestamp>,
    now: Timestamp,
) -> Option<Timestamp> {
    match (from.is_completed(), to.is_completed()) {
        (_, true) => Some(supplied.unwrap_or(now)),
        (true, false) => None,
        (false, false) => supplied,
    }
}

/// Bulk effect on the cards of a column whose own status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnStatusSync {
    /// Cards without a completion date get stamped with now.
    StampMissing,
    /// Every card's completion date is cleared.
    ClearAll,
    /// Nothing to do.
    Unchanged,
}

/// Decide how the cards of a column must be rewritten when the column's
/// status changes from `old` to `new`. Mirrors [`resolve_completion_date`]
/// applied to every card in the column.
pub fn column_status_sync(old: ColumnStatus, new: ColumnStatus) -> ColumnStatusSync {
    match (old.is_completed(), new.is_completed()) {
        (false, true) => ColumnStatusSync::StampMissing,
        (true, false) => ColumnStatusSync::ClearAll,
        _ => ColumnStatusSync::Unchanged,
    }
}

/// Reject a due date that falls before the start date.
pub fn validate_card_dates(
    start_date: Option<Timestamp>,
    due_date: Option<Timestamp>,
) -> Result<(), CoreError> {
    match (start_date, due_date) {
        (Some(start), Some(due)) if due < start => Err(CoreError::Validation(
            "Card due date must not be before its start date".into(),
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn earlier() -> Timestamp {
        now() - Duration::days(3)
    }

    // -- resolve_completion_date -----------------------------------------

    #[test]
    fn moving_into_completed_stamps_now() {
        let result =
            resolve_completion_date(ColumnStatus::Open, ColumnStatus::Completed, None, now());
        assert_eq!(result, Some(now()));
    }

    #[test]
    fn moving_into_completed_keeps_supplied_date() {
        let result = resolve_completion_date(
            ColumnStatus::Paused,
            ColumnStatus::Completed,
            Some(earlier()),
            now(),
        );
        assert_eq!(result, Some(earlier()));
    }

    #[test]
    fn moving_between_completed_columns_keeps_date() {
        let result = resolve_completion_date(
            ColumnStatus::Completed,
            ColumnStatus::Completed,
            Some(earlier()),
            now(),
        );
        assert_eq!(result, Some(earlier()));
    }

    #[test]
    fn moving_out_of_completed_clears() {
        for to in [ColumnStatus::Open, ColumnStatus::Paused] {
            let result =
                resolve_completion_date(ColumnStatus::Completed, to, Some(earlier()), now());
            assert_eq!(result, None, "moving to {to} must clear");
        }
    }

    #[test]
    fn moving_between_non_completed_columns_is_untouched() {
        assert_eq!(
            resolve_completion_date(ColumnStatus::Open, ColumnStatus::Paused, None, now()),
            None
        );
        assert_eq!(
            resolve_completion_date(ColumnStatus::Paused, ColumnStatus::Open, None, now()),
            None
        );
    }

    #[test]
    fn policy_is_total_and_keeps_invariant_from_consistent_state() {
        // Starting from a consistent card (date set iff column completed),
        // every transition lands in a consistent state.
        for &from in ColumnStatus::ALL {
            for &to in ColumnStatus::ALL {
                let existing = from.is_completed().then(earlier);
                let result = resolve_completion_date(from, to, existing, now());
                assert_eq!(
                    result.is_some(),
                    to.is_completed(),
                    "{from} -> {to} broke the completion invariant"
                );
            }
        }
    }

    #[test]
    fn scenario_todo_done_in_progress() {
        // A Fazer (open) -> Concluído (completed) -> Em Andamento (open).
        let created = resolve_completion_date(ColumnStatus::Open, ColumnStatus::Open, None, now());
        assert_eq!(created, None);

        let done =
            resolve_completion_date(ColumnStatus::Open, ColumnStatus::Completed, created, now());
        assert_eq!(done, Some(now()));

        let reopened =
            resolve_completion_date(ColumnStatus::Completed, ColumnStatus::Open, done, now());
        assert_eq!(reopened, None);
    }

    // -- column_status_sync ----------------------------------------------

    #[test]
    fn column_becoming_completed_stamps_missing() {
        assert_eq!(
            column_status_sync(ColumnStatus::Open, ColumnStatus::Completed),
            ColumnStatusSync::StampMissing
        );
    }

    #[test]
    fn column_leaving_completed_clears_all() {
        assert_eq!(
            column_status_sync(ColumnStatus::Completed, ColumnStatus::Paused),
            ColumnStatusSync::ClearAll
        );
    }

    #[test]
    fn column_status_sync_unchanged_otherwise() {
        assert_eq!(
            column_status_sync(ColumnStatus::Open, ColumnStatus::Paused),
            ColumnStatusSync::Unchanged
        );
        assert_eq!(
            column_status_sync(ColumnStatus::Completed, ColumnStatus::Completed),
            ColumnStatusSync::Unchanged
        );
    }

    // -- defaults ----------------------------------------------------------

    #[test]
    fn default_columns_end_with_single_completed_column() {
        let completed: Vec<_> = DEFAULT_COLUMNS
            .iter()
            .filter(|c| c.status.is_completed())
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(DEFAULT_COLUMNS.last().unwrap().name, "Concluído");
        assert_eq!(DEFAULT_COLUMNS.first().unwrap().name, "A Fazer");
    }

    // -- validate_card_dates -----------------------------------------------

    #[test]
    fn due_before_start_is_rejected() {
        assert_matches!(
            validate_card_dates(Some(now()), Some(earlier())),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn partial_or_ordered_dates_are_accepted() {
        assert!(validate_card_dates(None, Some(now())).is_ok());
        assert!(validate_card_dates(Some(now()), None).is_ok());
        assert!(validate_card_dates(Some(earlier()), Some(now())).is_ok());
        assert!(validate_card_dates(Some(now()), Some(now())).is_ok());
    }

    #[test]
    fn column_status_serializes_as_tag() {
        let json = serde_json::to_string(&ColumnStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        let parsed: ColumnStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(parsed, ColumnStatus::Paused);
    }
}
