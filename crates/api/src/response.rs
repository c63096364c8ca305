//! Shared response envelope types for API handlers.
//!
//! Entity responses use a `{ "data": ... }` envelope; list responses carry
//! their items alongside a pagination block. Use these instead of ad-hoc
//! `serde_json::json!` so payload shapes stay consistent.

use serde::Serialize;

use plenario_core::pagination::PageMeta;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated listing: the page of items plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}
