//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by any handler that supports paginated listing. Values are clamped
/// via [`PaginationParams::clamp`] before reaching the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Resolve to a concrete `(limit, offset)` pair: limit defaults to 50
    /// and is capped at `max_limit`, offset is non-negative.
    pub fn clamp(&self, max_limit: i64) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, max_limit);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}
