//! Dashboard aggregation: point-in-time card counts and the completion
//! trend. Pure functions over card snapshots loaded by the caller.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::calendar::local_date;
use crate::macros::define_text_enum;
use crate::types::{DbId, Timestamp};

/// Number of trailing periods in a completion trend.
pub const TREND_PERIODS: usize = 12;

define_text_enum! {
    /// Bucket size for the completion trend.
    TrendPeriod {
        Week = "week",
        Month = "month",
        Year = "year",
    }
}

/// The card fields the aggregator needs.
#[derive(Debug, Clone)]
pub struct CardSnapshot {
    pub id: DbId,
    pub column_id: DbId,
    pub due_date: Option<Timestamp>,
    pub completion_date: Option<Timestamp>,
}

/// Point-in-time dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_cards: usize,
    pub completed_this_month: usize,
    pub completed_this_year: usize,
    pub overdue_sla: usize,
    /// Cards sitting in a completed column without a completion date.
    pub inconsistent_completed_cards: usize,
}

/// Counters plus the ids of inconsistent cards, for the caller to log.
#[derive(Debug, Clone)]
pub struct StatsOutcome {
    pub stats: DashboardStats,
    pub inconsistent_card_ids: Vec<DbId>,
}

/// One trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendBucket {
    pub label: String,
    pub period_start: NaiveDate,
    pub completed: usize,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Compute dashboard counters over already-filtered cards.
///
/// A card counts as completed this month/year only when its column is in
/// `completed_columns` and its completion date falls in the current local
/// month/year. Cards in a completed column with no completion date are
/// never counted; they are reported as inconsistent instead.
pub fn compute_stats(
    cards: &[CardSnapshot],
    completed_columns: &HashSet<DbId>,
    now: Timestamp,
    offset: FixedOffset,
) -> StatsOutcome {
    let today = local_date(now, offset);
    let mut stats = DashboardStats {
        total_cards: cards.len(),
        completed_this_month: 0,
        completed_this_year: 0,
        overdue_sla: 0,
        inconsistent_completed_cards: 0,
    };
    let mut inconsistent_card_ids = Vec::new();

    for card in cards {
        let in_completed_column = completed_columns.contains(&card.column_id);

        if in_completed_column {
            match card.completion_date {
                Some(done) => {
                    let done = local_date(done, offset);
                    if done.year() == today.year() {
                        stats.completed_this_year += 1;
                        if done.month() == today.month() {
                            stats.completed_this_month += 1;
                        }
                    }
                }
                None => inconsistent_card_ids.push(card.id),
            }
        } else if card.due_date.is_some_and(|due| due < now) {
            stats.overdue_sla += 1;
        }
    }

    stats.inconsistent_completed_cards = inconsistent_card_ids.len();
    StatsOutcome {
        stats,
        inconsistent_card_ids,
    }
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

/// First day of the period containing `date`.
pub fn period_start(date: NaiveDate, period: TrendPeriod) -> NaiveDate {
    match period {
        TrendPeriod::Week => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        TrendPeriod::Month => date.with_day(1).unwrap_or(date),
        TrendPeriod::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
    }
}

/// First day of the period immediately before the one starting at `start`.
fn previous_period_start(start: NaiveDate, period: TrendPeriod) -> NaiveDate {
    match period {
        TrendPeriod::Week => start - Duration::days(7),
        TrendPeriod::Month => {
            let (year, month) = if start.month() == 1 {
                (start.year() - 1, 12)
            } else {
                (start.year(), start.month() - 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(start)
        }
        TrendPeriod::Year => NaiveDate::from_ymd_opt(start.year() - 1, 1, 1).unwrap_or(start),
    }
}

/// Display label for the period starting at `start`.
pub fn period_label(start: NaiveDate, period: TrendPeriod) -> String {
    match period {
        TrendPeriod::Week => {
            let week = start.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        TrendPeriod::Month => start.format("%Y-%m").to_string(),
        TrendPeriod::Year => start.format("%Y").to_string(),
    }
}

/// Bucket completion dates into the trailing [`TREND_PERIODS`] periods,
/// oldest first. Empty buckets are included with a zero count; completion
/// dates outside the window are ignored.
pub fn completion_trend(
    cards: &[CardSnapshot],
    period: TrendPeriod,
    now: Timestamp,
    offset: FixedOffset,
) -> Vec<TrendBucket> {
    let mut starts = Vec::with_capacity(TREND_PERIODS);
    let mut cursor = period_start(local_date(now, offset), period);
    for _ in 0..TREND_PERIODS {
        starts.push(cursor);
        cursor = previous_period_start(cursor, period);
    }
    starts.reverse();

    let index: HashMap<NaiveDate, usize> =
        starts.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let mut counts = vec![0usize; starts.len()];

    for done in cards.iter().filter_map(|c| c.completion_date) {
        let bucket = period_start(local_date(done, offset), period);
        if let Some(&i) = index.get(&bucket) {
            counts[i] += 1;
        }
    }

    starts
        .into_iter()
        .zip(counts)
        .map(|(start, completed)| TrendBucket {
            label: period_label(start, period),
            period_start: start,
            completed,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::offset_from_minutes;
    use chrono::{TimeZone, Utc};

    const DONE_COLUMN: DbId = 30;
    const OPEN_COLUMN: DbId = 10;

    fn utc() -> FixedOffset {
        offset_from_minutes(0).unwrap()
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    fn card(id: DbId, column_id: DbId, due: Option<Timestamp>, done: Option<Timestamp>) -> CardSnapshot {
        CardSnapshot {
            id,
            column_id,
            due_date: due,
            completion_date: done,
        }
    }

    fn completed_set() -> HashSet<DbId> {
        [DONE_COLUMN].into_iter().collect()
    }

    // -- compute_stats ---------------------------------------------------

    #[test]
    fn ten_cards_three_completed_this_month() {
        let mut cards: Vec<CardSnapshot> = (1..=3)
            .map(|i| card(i, DONE_COLUMN, None, Some(at(2026, 10, i as u32))))
            .collect();
        cards.extend((4..=10).map(|i| card(i, OPEN_COLUMN, None, None)));

        let outcome = compute_stats(&cards, &completed_set(), now(), utc());
        assert_eq!(outcome.stats.total_cards, 10);
        assert_eq!(outcome.stats.completed_this_month, 3);
        assert_eq!(outcome.stats.completed_this_year, 3);
    }

    #[test]
    fn earlier_month_counts_for_year_only() {
        let cards = vec![
            card(1, DONE_COLUMN, None, Some(at(2026, 2, 10))),
            card(2, DONE_COLUMN, None, Some(at(2025, 10, 10))),
        ];
        let outcome = compute_stats(&cards, &completed_set(), now(), utc());
        assert_eq!(outcome.stats.completed_this_month, 0);
        assert_eq!(outcome.stats.completed_this_year, 1);
    }

    #[test]
    fn completed_column_without_date_is_inconsistent_not_counted() {
        let cards = vec![card(7, DONE_COLUMN, None, None)];
        let outcome = compute_stats(&cards, &completed_set(), now(), utc());
        assert_eq!(outcome.stats.completed_this_month, 0);
        assert_eq!(outcome.stats.completed_this_year, 0);
        assert_eq!(outcome.stats.inconsistent_completed_cards, 1);
        assert_eq!(outcome.inconsistent_card_ids, vec![7]);
    }

    #[test]
    fn date_outside_completed_column_is_not_counted() {
        let cards = vec![card(1, OPEN_COLUMN, None, Some(at(2026, 10, 1)))];
        let outcome = compute_stats(&cards, &completed_set(), now(), utc());
        assert_eq!(outcome.stats.completed_this_month, 0);
    }

    #[test]
    fn overdue_only_counts_unfinished_past_due() {
        let cards = vec![
            card(1, OPEN_COLUMN, Some(at(2026, 10, 1)), None),
            card(2, OPEN_COLUMN, Some(at(2026, 11, 1)), None),
            card(3, DONE_COLUMN, Some(at(2026, 10, 1)), Some(at(2026, 10, 2))),
            card(4, OPEN_COLUMN, None, None),
        ];
        let outcome = compute_stats(&cards, &completed_set(), now(), utc());
        assert_eq!(outcome.stats.overdue_sla, 1);
    }

    #[test]
    fn month_boundary_respects_offset() {
        // 02:00 UTC on Oct 1st is still September at UTC-03:00.
        let cards = vec![card(
            1,
            DONE_COLUMN,
            None,
            Some(Utc.with_ymd_and_hms(2026, 10, 1, 2, 0, 0).unwrap()),
        )];
        let brt = offset_from_minutes(-180).unwrap();
        let outcome = compute_stats(&cards, &completed_set(), now(), brt);
        assert_eq!(outcome.stats.completed_this_month, 0);
        assert_eq!(outcome.stats.completed_this_year, 1);
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let outcome = compute_stats(&[], &completed_set(), now(), utc());
        assert_eq!(outcome.stats.total_cards, 0);
        assert_eq!(outcome.stats.overdue_sla, 0);
    }

    // -- period helpers --------------------------------------------------

    #[test]
    fn week_starts_on_monday() {
        // 2026-10-19 is a Monday; 2026-10-21 a Wednesday.
        let wed = NaiveDate::from_ymd_opt(2026, 10, 21).unwrap();
        assert_eq!(
            period_start(wed, TrendPeriod::Week),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
    }

    #[test]
    fn labels_per_period() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(period_label(d, TrendPeriod::Week), "2026-W43");
        assert_eq!(period_label(d, TrendPeriod::Month), "2026-10");
        assert_eq!(period_label(d, TrendPeriod::Year), "2026");
    }

    #[test]
    fn iso_week_label_uses_iso_year() {
        // 2027-01-01 is a Friday in ISO week 2026-W53.
        let d = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        let start = period_start(d, TrendPeriod::Week);
        assert_eq!(period_label(start, TrendPeriod::Week), "2026-W53");
    }

    // -- completion_trend ------------------------------------------------

    #[test]
    fn monthly_trend_has_twelve_chronological_buckets() {
        let trend = completion_trend(&[], TrendPeriod::Month, now(), utc());
        assert_eq!(trend.len(), TREND_PERIODS);
        assert_eq!(trend.first().unwrap().label, "2025-11");
        assert_eq!(trend.last().unwrap().label, "2026-10");
        assert!(trend.iter().all(|b| b.completed == 0));
        assert!(trend.windows(2).all(|w| w[0].period_start < w[1].period_start));
    }

    #[test]
    fn monthly_trend_wraps_year() {
        let jan = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let trend = completion_trend(&[], TrendPeriod::Month, jan, utc());
        assert_eq!(trend.first().unwrap().label, "2025-02");
        assert_eq!(trend[10].label, "2025-12");
        assert_eq!(trend[11].label, "2026-01");
    }

    #[test]
    fn trend_counts_and_ignores_out_of_window() {
        let cards = vec![
            card(1, DONE_COLUMN, None, Some(at(2026, 10, 2))),
            card(2, DONE_COLUMN, None, Some(at(2026, 10, 15))),
            card(3, DONE_COLUMN, None, Some(at(2026, 3, 3))),
            card(4, DONE_COLUMN, None, Some(at(2024, 3, 3))),
            card(5, OPEN_COLUMN, None, None),
        ];
        let trend = completion_trend(&cards, TrendPeriod::Month, now(), utc());
        let by_label: HashMap<_, _> = trend.iter().map(|b| (b.label.as_str(), b.completed)).collect();
        assert_eq!(by_label["2026-10"], 2);
        assert_eq!(by_label["2026-03"], 1);
        let sum: usize = trend.iter().map(|b| b.completed).sum();
        assert_eq!(sum, 3);
        assert!(sum <= cards.len());
    }

    #[test]
    fn trend_sum_equals_dated_cards_within_window() {
        let cards: Vec<_> = (0..12)
            .map(|i| card(i, DONE_COLUMN, None, Some(now() - Duration::weeks(i))))
            .chain([card(99, OPEN_COLUMN, None, None)])
            .collect();
        let trend = completion_trend(&cards, TrendPeriod::Week, now(), utc());
        let sum: usize = trend.iter().map(|b| b.completed).sum();
        let dated = cards.iter().filter(|c| c.completion_date.is_some()).count();
        assert_eq!(sum, dated);
        assert!(trend.iter().all(|b| b.completed == 1));
    }

    #[test]
    fn yearly_trend_spans_twelve_years() {
        let trend = completion_trend(&[], TrendPeriod::Year, now(), utc());
        assert_eq!(trend.first().unwrap().label, "2015");
        assert_eq!(trend.last().unwrap().label, "2026");
    }
}
