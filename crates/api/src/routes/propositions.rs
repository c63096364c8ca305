//! Route definitions for proposition listings.

use axum::routing::get;
use axum::Router;

use crate::handlers::propositions;
use crate::state::AppState;

/// Proposition routes mounted at `/propositions`.
///
/// ```text
/// GET /    -> list_propositions
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(propositions::list_propositions))
}
