//! Shared response envelope types for API handlers.
//!
//! Computed views (dashboard, funnel summary) use a `{ "data": ... }`
//! envelope; plain entity endpoints return the entity itself.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
