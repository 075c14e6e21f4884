//! Shared query parameter types for API handlers.

use crmboard_core::dashboard::TrendPeriod;
use crmboard_core::types::{DbId, Timestamp};
use serde::Deserialize;

/// Filters accepted by `/dashboard/stats` (`?project_id=&technician_id=&from=&to=`).
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub project_id: Option<DbId>,
    pub technician_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}

/// Filters accepted by `/dashboard/completion-trend`, plus the bucket size.
///
/// Fields are repeated rather than flattened: `serde(flatten)` breaks
/// numeric parsing in url-encoded queries.
#[derive(Debug, Default, Deserialize)]
pub struct TrendParams {
    pub project_id: Option<DbId>,
    pub technician_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    /// Defaults to `month`.
    pub period: Option<TrendPeriod>,
}

/// `?column_id=` for funnel card listing.
#[derive(Debug, Default, Deserialize)]
pub struct FunnelCardParams {
    pub column_id: Option<DbId>,
}
