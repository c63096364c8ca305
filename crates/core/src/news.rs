//! News domain constants, validation, and engagement scoring.
//!
//! Pure functions used by the repository layer, the pipeline, and the API
//! handlers. Lives in `core` to keep the zero-internal-dependency rule.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Engagement score a news row must reach before the social trigger fires.
/// Overridable via `ENGAGEMENT_THRESHOLD` at the API layer.
pub const DEFAULT_ENGAGEMENT_THRESHOLD: i32 = 100;

/// Vote direction: increments `upvotes`.
pub const VOTE_UPVOTE: &str = "upvote";
/// Vote direction: increments `downvotes`.
pub const VOTE_DOWNVOTE: &str = "downvote";

/// Batch concurrency bounds for the generation pipeline.
pub const MIN_BATCH_CONCURRENCY: usize = 1;
pub const MAX_BATCH_CONCURRENCY: usize = 10;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 3;

/// Columns a news listing may be ordered by. Anything else falls back to
/// `created_at` — the value is interpolated into SQL, so it must come from
/// this list.
pub const ORDERABLE_FIELDS: &[&str] = &[
    "created_at",
    "presentation_date",
    "engagement_score",
    "upvotes",
    "title",
];

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// Engagement is upvotes minus downvotes. The `news.engagement_score` column
/// must always equal this for the row's counters.
pub fn engagement_score(upvotes: i32, downvotes: i32) -> i32 {
    upvotes - downvotes
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a vote type string (`upvote` or `downvote`).
pub fn validate_vote_type(vote_type: &str) -> Result<(), CoreError> {
    if vote_type == VOTE_UPVOTE || vote_type == VOTE_DOWNVOTE {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "vote_type must be \"{VOTE_UPVOTE}\" or \"{VOTE_DOWNVOTE}\", got \"{vote_type}\""
        )))
    }
}

/// Resolve a user-supplied ordering column against [`ORDERABLE_FIELDS`].
///
/// Unknown or missing fields fall back to `created_at` rather than erroring,
/// matching the listing endpoint's lenient contract.
pub fn resolve_order_field(field: Option<&str>) -> &'static str {
    match field {
        Some(f) => ORDERABLE_FIELDS
            .iter()
            .find(|candidate| **candidate == f)
            .copied()
            .unwrap_or("created_at"),
        None => "created_at",
    }
}

/// Validate an ordering direction, returning the SQL keyword.
pub fn validate_order_direction(direction: &str) -> Result<&'static str, CoreError> {
    match direction {
        "asc" => Ok("ASC"),
        "desc" => Ok("DESC"),
        other => Err(CoreError::Validation(format!(
            "order_direction must be \"asc\" or \"desc\", got \"{other}\""
        ))),
    }
}

/// Validate a UF (state) filter: at most two characters.
pub fn validate_uf(uf: &str) -> Result<(), CoreError> {
    if uf.is_empty() || uf.chars().count() > 2 {
        return Err(CoreError::Validation(
            "uf must be a two-letter state code".to_string(),
        ));
    }
    Ok(())
}

/// Clamp a requested batch concurrency into the allowed range.
pub fn clamp_concurrency(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_BATCH_CONCURRENCY)
        .clamp(MIN_BATCH_CONCURRENCY, MAX_BATCH_CONCURRENCY)
}

// ---------------------------------------------------------------------------
// Article metadata
// ---------------------------------------------------------------------------

/// Shape of the `extra_metadata` JSON column: classifier output from the
/// article generator plus extraction stats for the source PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleMetadata {
    pub tags: Vec<String>,
    pub impact_level: String,
    pub target_audience: Vec<String>,
    pub pdf_pages: usize,
    pub word_count: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
