pub mod health;
pub mod news;
pub mod propositions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /propositions                          list from warehouse (GET)
///
/// /news/generate/batch                   batch generation (POST)
/// /news/generate/background              queued batch generation (POST)
/// /news/generate/{proposition_id}        single generation (POST)
/// /news                                  filtered listing (GET)
/// /news/top/engagement                   top by engagement (GET)
/// /news/proposition/{proposition_id}     lookup by proposition (GET)
/// /news/{id}                             detail (GET), delete (DELETE)
/// /news/{id}/vote                        vote (PATCH)
/// /news/{id}/check-social-publish        social trigger (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Proposition listings from the analytical warehouse.
        .nest("/propositions", propositions::router())
        // News generation, CRUD, voting, and the social trigger.
        .nest("/news", news::router())
}
