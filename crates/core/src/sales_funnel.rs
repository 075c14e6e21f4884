//! Sales pipeline board totals.
//!
//! The funnel is a plain board: moving a card never touches dates.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Card value reduced to what the summary needs.
#[derive(Debug, Clone, Copy)]
pub struct FunnelCardValue {
    pub column_id: DbId,
    pub value_cents: i64,
}

/// Totals for one funnel column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnTotal {
    pub column_id: DbId,
    pub card_count: usize,
    pub total_value_cents: i64,
}

/// Totals for the whole funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelSummary {
    pub columns: Vec<ColumnTotal>,
    pub total_cards: usize,
    pub total_value_cents: i64,
}

/// Monetary values are non-negative integer cents.
pub fn validate_value_cents(value_cents: i64) -> Result<(), CoreError> {
    if value_cents < 0 {
        return Err(CoreError::Validation(
            "Card value must not be negative".into(),
        ));
    }
    Ok(())
}

/// Sum card counts and values per column, in `column_order`.
///
/// Cards referencing a column not in `column_order` are ignored. Sums
/// saturate instead of overflowing.
pub fn summarize(column_order: &[DbId], cards: &[FunnelCardValue]) -> FunnelSummary {
    let mut per_column: HashMap<DbId, (usize, i64)> =
        column_order.iter().map(|id| (*id, (0, 0))).collect();
    for card in cards {
        if let Some((count, total)) = per_column.get_mut(&card.column_id) {
            *count += 1;
            *total = total.saturating_add(card.value_cents);
        }
    }

    let columns: Vec<ColumnTotal> = column_order
        .iter()
        .map(|id| {
            let (card_count, total_value_cents) = per_column.get(id).copied().unwrap_or((0, 0));
            ColumnTotal {
                column_id: *id,
                card_count,
                total_value_cents,
            }
        })
        .collect();

    FunnelSummary {
        total_cards: columns.iter().map(|c| c.card_count).sum(),
        total_value_cents: columns
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.total_value_cents)),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(column_id: DbId, value_cents: i64) -> FunnelCardValue {
        FunnelCardValue {
            column_id,
            value_cents,
        }
    }

    #[test]
    fn summary_keeps_column_order_and_empty_columns() {
        let summary = summarize(&[3, 1, 2], &[card(1, 500), card(1, 250), card(3, 1_000)]);
        let ids: Vec<DbId> = summary.columns.iter().map(|c| c.column_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(summary.columns[1].card_count, 2);
        assert_eq!(summary.columns[1].total_value_cents, 750);
        assert_eq!(summary.columns[2].card_count, 0);
        assert_eq!(summary.total_cards, 3);
        assert_eq!(summary.total_value_cents, 1_750);
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let summary = summarize(&[1], &[card(9, 100)]);
        assert_eq!(summary.total_cards, 0);
        assert_eq!(summary.total_value_cents, 0);
    }

    #[test]
    fn totals_saturate() {
        let summary = summarize(&[1], &[card(1, i64::MAX), card(1, 10)]);
        assert_eq!(summary.total_value_cents, i64::MAX);
    }

    #[test]
    fn negative_value_is_rejected() {
        assert!(validate_value_cents(-1).is_err());
        assert!(validate_value_cents(0).is_ok());
    }
}
