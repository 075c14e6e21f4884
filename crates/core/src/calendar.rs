//! Local-calendar helpers.
//!
//! Month/year boundaries and Gantt day cells are computed in a fixed UTC
//! offset configured at startup, never in the server's ambient timezone.

use chrono::{FixedOffset, NaiveDate};

use crate::types::Timestamp;

/// Seconds in one minute, for offset conversion.
const SECS_PER_MINUTE: i32 = 60;

/// Build a [`FixedOffset`] from a signed number of minutes east of UTC.
///
/// Returns `None` when the offset is outside +/- 24 hours.
pub fn offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    minutes
        .checked_mul(SECS_PER_MINUTE)
        .and_then(FixedOffset::east_opt)
}

/// The calendar date of `ts` as seen from `offset` (time of day stripped).
pub fn local_date(ts: Timestamp, offset: FixedOffset) -> NaiveDate {
    ts.with_timezone(&offset).date_naive()
}
