//! Route definitions for the news resource.
//!
//! The static segments (`generate/batch`, `top/engagement`,
//! `proposition/{...}`) are distinct from the parameterized `/{id}` routes,
//! so a news UUID can never shadow them.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::news;
use crate::state::AppState;

/// News routes mounted at `/news`.
///
/// ```text
/// POST   /generate/batch                -> generate_batch
/// POST   /generate/background           -> generate_background
/// POST   /generate/{proposition_id}     -> generate_for_proposition
/// GET    /                              -> list_news
/// GET    /top/engagement                -> top_engagement
/// GET    /proposition/{proposition_id}  -> get_news_by_proposition
/// GET    /{id}                          -> get_news
/// DELETE /{id}                          -> delete_news
/// PATCH  /{id}/vote                     -> vote_on_news
/// POST   /{id}/check-social-publish     -> check_social_publish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate/batch", post(news::generate_batch))
        .route("/generate/background", post(news::generate_background))
        .route(
            "/generate/{proposition_id}",
            post(news::generate_for_proposition),
        )
        .route("/", get(news::list_news))
        .route("/top/engagement", get(news::top_engagement))
        .route(
            "/proposition/{proposition_id}",
            get(news::get_news_by_proposition),
        )
        .route("/{id}", get(news::get_news).delete(news::delete_news))
        .route("/{id}/vote", patch(news::vote_on_news))
        .route(
            "/{id}/check-social-publish",
            post(news::check_social_publish),
        )
}
