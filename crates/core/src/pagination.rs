//! Page-based pagination helpers.
//!
//! The news listing uses 1-indexed pages with a bounded per-page limit; the
//! clamping and page-count math live here so the repository and handlers
//! share one definition.

use serde::Serialize;

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of items per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Maximum number of rows the top-engagement endpoint returns.
pub const MAX_TOP_LIMIT: i64 = 50;

/// Default number of rows the top-engagement endpoint returns.
pub const DEFAULT_TOP_LIMIT: i64 = 10;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided 1-indexed page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Pagination block returned alongside listed items.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    /// Compute page metadata for a result set.
    ///
    /// An empty result set still reports one page so clients can render a
    /// stable pager.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if total > 0 {
            (total + limit - 1) / limit
        } else {
            1
        };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
