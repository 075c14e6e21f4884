//! Gantt stages: hierarchy rules, progress, and timeline layout.
//!
//! Stages form a two-level arena keyed by id. Level-1 stages are top-level;
//! level-2 stages reference a level-1 parent through `parent_stage_id`.

use std::collections::HashMap;

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::local_date;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Stage depth. Stored as `SMALLINT` 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum StageLevel {
    Top = 1,
    Sub = 2,
}

impl TryFrom<i16> for StageLevel {
    type Error = CoreError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StageLevel::Top),
            2 => Ok(StageLevel::Sub),
            other => Err(CoreError::Validation(format!(
                "Stage level must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<StageLevel> for i16 {
    fn from(level: StageLevel) -> Self {
        level as i16
    }
}

// ---------------------------------------------------------------------------
// Hierarchy rules
// ---------------------------------------------------------------------------

/// Level-1 stages must not have a parent; level-2 stages must have one.
pub fn validate_stage_hierarchy(
    level: StageLevel,
    parent_stage_id: Option<DbId>,
) -> Result<(), CoreError> {
    match (level, parent_stage_id) {
        (StageLevel::Top, Some(_)) => Err(CoreError::Validation(
            "Level 1 stages must not have a parent stage".into(),
        )),
        (StageLevel::Sub, None) => Err(CoreError::Validation(
            "Level 2 stages must reference a level 1 parent stage".into(),
        )),
        _ => Ok(()),
    }
}

/// Reject a stage ending before it starts.
pub fn validate_stage_dates(starts_at: Timestamp, ends_at: Timestamp) -> Result<(), CoreError> {
    if ends_at < starts_at {
        return Err(CoreError::Validation(
            "Stage end date must not be before its start date".into(),
        ));
    }
    Ok(())
}

/// `completed / total * 100`, rounded half up. Zero when there are no stages.
pub fn compute_overall_progress(completed: i64, total: i64) -> i32 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    // Integer rounding: (200c + t) / 2t == round(100c / t).
    let pct = (200 * completed + total) / (2 * total);
    pct as i32
}

// ---------------------------------------------------------------------------
// Layout types
// ---------------------------------------------------------------------------

/// The stage fields the layout engine needs.
#[derive(Debug, Clone)]
pub struct GanttStage {
    pub id: DbId,
    pub level: StageLevel,
    pub parent_stage_id: Option<DbId>,
    pub sort_order: i32,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Horizontal placement of a bar, as percentages of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarPosition {
    pub left_pct: f64,
    pub width_pct: f64,
}

/// A run of consecutive grid days in the same month (header cell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSegment {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub start_index: usize,
    pub day_count: usize,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub stage_id: DbId,
    pub level: StageLevel,
    pub parent_stage_id: Option<DbId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    #[serde(flatten)]
    pub bar: BarPosition,
}

/// Full layout for one polo project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttLayout {
    pub timeline_start: Option<NaiveDate>,
    pub timeline_end: Option<NaiveDate>,
    pub total_days: usize,
    pub months: Vec<MonthSegment>,
    pub rows: Vec<GanttRow>,
}

// ---------------------------------------------------------------------------
// Layout steps
// ---------------------------------------------------------------------------

/// Earliest local start date and latest local end date across `stages`.
///
/// The end is never before the start, so the day grid is never empty.
pub fn timeline_bounds(
    stages: &[GanttStage],
    offset: FixedOffset,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = stages.iter().map(|s| local_date(s.starts_at, offset)).min()?;
    let end = stages.iter().map(|s| local_date(s.ends_at, offset)).max()?;
    Some((start, end.max(start)))
}

/// Every calendar day from `start` to `end`, inclusive.
pub fn day_grid(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Group consecutive grid days by month, for header rendering.
pub fn month_segments(days: &[NaiveDate]) -> Vec<MonthSegment> {
    let mut segments: Vec<MonthSegment> = Vec::new();
    for (i, day) in days.iter().enumerate() {
        match segments.last_mut() {
            Some(seg) if seg.year == day.year() && seg.month == day.month() => {
                seg.day_count += 1;
            }
            _ => segments.push(MonthSegment {
                year: day.year(),
                month: day.month(),
                label: day.format("%Y-%m").to_string(),
                start_index: i,
                day_count: 1,
            }),
        }
    }
    segments
}

/// Index of `date` in the sorted `grid`, or of the first grid day after it.
/// Dates past the end clamp to the last day.
fn grid_index(grid: &[NaiveDate], date: NaiveDate) -> usize {
    let i = grid.binary_search(&date).unwrap_or_else(|insert_at| insert_at);
    i.min(grid.len().saturating_sub(1))
}

/// Position a bar spanning `start..=end` on `grid`.
///
/// Width is at least one day, so zero-length and inverted stages stay
/// visible. `left + width` never exceeds 100.
pub fn bar_position(start: NaiveDate, end: NaiveDate, grid: &[NaiveDate]) -> BarPosition {
    if grid.is_empty() {
        return BarPosition {
            left_pct: 0.0,
            width_pct: 0.0,
        };
    }
    let total = grid.len() as f64;
    let start_index = grid_index(grid, start);
    let end_index = grid_index(grid, end).max(start_index);
    let span = (end_index - start_index + 1) as f64;
    BarPosition {
        left_pct: start_index as f64 / total * 100.0,
        width_pct: span / total * 100.0,
    }
}

/// Row order: level-1 stages by `sort_order`, each followed by its level-2
/// children by `sort_order`. Sub-stages whose parent is absent from the set
/// are appended at the end, by `sort_order`.
///
/// Ties on `sort_order` keep id order so the result is deterministic.
pub fn hierarchical_order(stages: &[GanttStage]) -> Vec<&GanttStage> {
    let mut tops: Vec<&GanttStage> = stages
        .iter()
        .filter(|s| s.level == StageLevel::Top)
        .collect();
    tops.sort_by_key(|s| (s.sort_order, s.id));

    let mut children: HashMap<DbId, Vec<&GanttStage>> = HashMap::new();
    let mut orphans: Vec<&GanttStage> = Vec::new();
    for stage in stages.iter().filter(|s| s.level == StageLevel::Sub) {
        match stage.parent_stage_id {
            Some(parent) if tops.iter().any(|t| t.id == parent) => {
                children.entry(parent).or_default().push(stage);
            }
            _ => orphans.push(stage),
        }
    }

    let mut rows = Vec::with_capacity(stages.len());
    for top in tops {
        rows.push(top);
        if let Some(mut kids) = children.remove(&top.id) {
            kids.sort_by_key(|s| (s.sort_order, s.id));
            rows.extend(kids);
        }
    }
    orphans.sort_by_key(|s| (s.sort_order, s.id));
    rows.extend(orphans);
    rows
}

/// Compute the whole Gantt layout for a set of stages.
pub fn build_layout(stages: &[GanttStage], offset: FixedOffset) -> GanttLayout {
    let Some((timeline_start, timeline_end)) = timeline_bounds(stages, offset) else {
        return GanttLayout {
            timeline_start: None,
            timeline_end: None,
            total_days: 0,
            months: Vec::new(),
            rows: Vec::new(),
        };
    };

    let grid = day_grid(timeline_start, timeline_end);
    let rows = hierarchical_order(stages)
        .into_iter()
        .map(|stage| {
            let start_date = local_date(stage.starts_at, offset);
            let end_date = local_date(stage.ends_at, offset);
            GanttRow {
                stage_id: stage.id,
                level: stage.level,
                parent_stage_id: stage.parent_stage_id,
                start_date,
                end_date,
                duration_days: inclusive_days(start_date, end_date),
                bar: bar_position(start_date, end_date, &grid),
            }
        })
        .collect();

    GanttLayout {
        timeline_start: Some(timeline_start),
        timeline_end: Some(timeline_end),
        total_days: grid.len(),
        months: month_segments(&grid),
        rows,
    }
}

/// Whole days between two local dates, inclusive, never less than one.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start + Duration::days(1)).num_days().max(1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
