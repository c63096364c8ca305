//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Concurrency override for the generation endpoints
/// (`?max_concurrent=`, clamped to 1-10 in core).
#[derive(Debug, Deserialize)]
pub struct ConcurrencyParams {
    pub max_concurrent: Option<usize>,
}

/// Limit parameter for the top-engagement endpoint.
#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub limit: Option<i64>,
}

/// Query parameters for the proposition listing.
#[derive(Debug, Deserialize)]
pub struct PropositionParams {
    pub keywords: Option<String>,
    pub uf: Option<String>,
    /// Proposition kind acronym (PL, PEC, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<i64>,
    #[serde(alias = "perPage")]
    pub per_page: Option<i64>,
}
