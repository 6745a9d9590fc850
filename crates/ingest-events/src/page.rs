//! Pagination window normalisation for [`list_recent`](crate::list_recent).

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: i64 = 50;

/// Largest page size a caller can request.
pub const MAX_LIMIT: i64 = 200;

/// A normalised pagination window over events ordered newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of events to return, within `1..=MAX_LIMIT`.
    pub limit: i64,
    /// Number of most recent events to skip, never negative.
    pub offset: i64,
}

impl Page {
    /// Builds a page from raw caller input.
    ///
    /// `limit` defaults to [`DEFAULT_LIMIT`] and is clamped to
    /// `[1, MAX_LIMIT]`; `offset` defaults to 0 and is clamped to a minimum
    /// of 0 with no upper bound. Out-of-range input is never an error.
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::clamped(None, None)
    }
}
