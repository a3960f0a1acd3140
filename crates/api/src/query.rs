//! Shared query parameter types for API handlers.

use autoriza_core::types::DbId;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?campus_id=` filter for event listings.
#[derive(Debug, Deserialize)]
pub struct CampusFilter {
    pub campus_id: Option<DbId>,
}
