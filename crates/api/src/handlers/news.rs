//! Handlers for news generation, listing, voting, and the social trigger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use plenario_core::error::CoreError;
use plenario_core::news::{
    clamp_concurrency, resolve_order_field, validate_order_direction, validate_uf,
    validate_vote_type,
};
use plenario_core::pagination::{
    clamp_limit, clamp_page, PageMeta, DEFAULT_PAGE_LIMIT, DEFAULT_TOP_LIMIT, MAX_PAGE_LIMIT,
    MAX_TOP_LIMIT,
};
use plenario_core::proposition::Proposition;
use plenario_core::social::build_post_text;
use plenario_core::types::{NewsId, PropositionId};
use plenario_db::models::news::NewsListFilter;
use plenario_db::repositories::NewsRepo;

use crate::error::{AppError, AppResult};
use crate::query::{ConcurrencyParams, TopParams};
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response payloads
// ---------------------------------------------------------------------------

/// Body of the vote endpoint.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: String,
}

/// Acknowledgment returned by the background generation endpoint.
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub message: String,
    pub status: &'static str,
}

/// Result of the social publish trigger.
#[derive(Debug, Serialize)]
pub struct SocialPublishCheck {
    pub should_publish: bool,
    pub engagement_score: i32,
    pub engagement_threshold: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter_post_url: Option<String>,
}

/// Confirmation returned after deleting a news row.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub id: NewsId,
}

// ---------------------------------------------------------------------------
// POST /news/generate/batch
// ---------------------------------------------------------------------------

/// Generate news for a batch of propositions synchronously.
///
/// Runs the pipeline behind a semaphore of `max_concurrent` permits and
/// returns per-item outcomes; one bad proposition never fails the batch.
pub async fn generate_batch(
    State(state): State<AppState>,
    Query(params): Query<ConcurrencyParams>,
    Json(propositions): Json<Vec<Proposition>>,
) -> AppResult<impl IntoResponse> {
    let max_concurrent = clamp_concurrency(params.max_concurrent);

    tracing::info!(
        count = propositions.len(),
        max_concurrent,
        "Batch generation requested"
    );

    let summary = state
        .orchestrator
        .batch_process(propositions, max_concurrent)
        .await;

    Ok(Json(summary))
}

// ---------------------------------------------------------------------------
// POST /news/generate/background
// ---------------------------------------------------------------------------

/// Queue batch generation on a background task and return immediately.
pub async fn generate_background(
    State(state): State<AppState>,
    Query(params): Query<ConcurrencyParams>,
    Json(propositions): Json<Vec<Proposition>>,
) -> AppResult<impl IntoResponse> {
    let max_concurrent = clamp_concurrency(params.max_concurrent);
    let count = propositions.len();

    tracing::info!(count, max_concurrent, "Queuing background generation");

    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        orchestrator.batch_process(propositions, max_concurrent).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(QueuedResponse {
            message: format!("Background processing started for {count} propositions"),
            status: "queued",
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /news/generate/{proposition_id}
// ---------------------------------------------------------------------------

/// Generate news for a single proposition synchronously.
pub async fn generate_for_proposition(
    State(state): State<AppState>,
    Path(proposition_id): Path<PropositionId>,
    Json(proposition): Json<Proposition>,
) -> AppResult<impl IntoResponse> {
    tracing::info!(proposition_id, "Single generation requested");

    let outcome = state.orchestrator.process_proposition(&proposition).await;

    if !outcome.success {
        return Err(AppError::PipelineFailed(
            outcome.error.unwrap_or_else(|| "Processing failed".to_string()),
        ));
    }

    Ok(Json(outcome))
}

// ---------------------------------------------------------------------------
// GET /news
// ---------------------------------------------------------------------------

/// List news with filters, whitelisted ordering, and pagination.
pub async fn list_news(
    State(state): State<AppState>,
    Query(filter): Query<NewsListFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref uf) = filter.uf {
        validate_uf(uf)?;
    }

    let order_field = resolve_order_field(filter.order_by.as_deref());
    let order_dir = validate_order_direction(filter.order_direction.as_deref().unwrap_or("desc"))?;

    let page = clamp_page(filter.page);
    let limit = clamp_limit(filter.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = (page - 1) * limit;

    let (items, total) =
        NewsRepo::list_filtered(&state.pool, &filter, order_field, order_dir, limit, offset)
            .await?;

    Ok(Json(PaginatedResponse {
        items,
        pagination: PageMeta::new(page, limit, total),
    }))
}

// ---------------------------------------------------------------------------
// GET /news/{id}
// ---------------------------------------------------------------------------

/// Get full news details by ID.
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<NewsId>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: id.to_string(),
        }))?;

    Ok(Json(DataResponse { data: news }))
}

// ---------------------------------------------------------------------------
// GET /news/proposition/{proposition_id}
// ---------------------------------------------------------------------------

/// Look up the news generated for a proposition, if any.
///
/// The index script uses this to skip already-processed propositions.
pub async fn get_news_by_proposition(
    State(state): State<AppState>,
    Path(proposition_id): Path<PropositionId>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::find_by_proposition_id(&state.pool, proposition_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: proposition_id.to_string(),
        }))?;

    Ok(Json(DataResponse { data: news }))
}

// ---------------------------------------------------------------------------
// PATCH /news/{id}/vote
// ---------------------------------------------------------------------------

/// Apply an upvote or downvote and return the updated row.
pub async fn vote_on_news(
    State(state): State<AppState>,
    Path(id): Path<NewsId>,
    Json(vote): Json<VoteRequest>,
) -> AppResult<impl IntoResponse> {
    validate_vote_type(&vote.vote_type)?;

    let updated = NewsRepo::record_vote(&state.pool, id, &vote.vote_type)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: id.to_string(),
        }))?;

    tracing::info!(
        news_id = %id,
        vote_type = %vote.vote_type,
        engagement_score = updated.engagement_score,
        "Vote recorded"
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// GET /news/top/engagement
// ---------------------------------------------------------------------------

/// Top news ordered by engagement score.
pub async fn top_engagement(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let items = NewsRepo::top_by_engagement(&state.pool, limit).await?;

    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /news/{id}/check-social-publish
// ---------------------------------------------------------------------------

/// Social publish trigger.
///
/// When the engagement threshold is met and the row is not yet published:
/// post to the configured social account (best-effort — a posting failure
/// is logged, not fatal), then mark the row published and record the post
/// URL.
pub async fn check_social_publish(
    State(state): State<AppState>,
    Path(id): Path<NewsId>,
) -> AppResult<impl IntoResponse> {
    let news = NewsRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: id.to_string(),
        }))?;

    let threshold = state.config.engagement_threshold;

    if news.published_to_social {
        let published_on = news
            .social_publish_date
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "an unknown date".to_string());
        return Ok(Json(SocialPublishCheck {
            should_publish: false,
            engagement_score: news.engagement_score,
            engagement_threshold: threshold,
            message: format!("Already published on {published_on}"),
            twitter_post_url: news.twitter_post_url,
        }));
    }

    if news.engagement_score < threshold {
        return Ok(Json(SocialPublishCheck {
            should_publish: false,
            engagement_score: news.engagement_score,
            engagement_threshold: threshold,
            message: format!(
                "Engagement too low ({}/{threshold})",
                news.engagement_score
            ),
            twitter_post_url: None,
        }));
    }

    // Threshold met: post if we can, then mark published either way.
    let post_url = if state.social.is_configured() {
        let article_url = format!(
            "{}/noticia/{}",
            state.config.site_base_url.trim_end_matches('/'),
            news.id
        );
        let text = build_post_text(&news.title, &news.summary, &article_url);

        match state.social.create_post(&text).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(news_id = %id, error = %e, "Social posting failed");
                None
            }
        }
    } else {
        None
    };

    let updated = NewsRepo::mark_published(&state.pool, id, post_url.as_deref())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: id.to_string(),
        }))?;

    tracing::info!(
        news_id = %id,
        engagement_score = updated.engagement_score,
        posted = updated.twitter_post_url.is_some(),
        "News published to social"
    );

    Ok(Json(SocialPublishCheck {
        should_publish: true,
        engagement_score: updated.engagement_score,
        engagement_threshold: threshold,
        message: format!(
            "News marked for social publishing (engagement: {})",
            updated.engagement_score
        ),
        twitter_post_url: updated.twitter_post_url,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /news/{id}
// ---------------------------------------------------------------------------

/// Delete a news row.
pub async fn delete_news(
    State(state): State<AppState>,
    Path(id): Path<NewsId>,
) -> AppResult<impl IntoResponse> {
    let deleted = NewsRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "News",
            id: id.to_string(),
        }));
    }

    tracing::info!(news_id = %id, "News deleted");

    Ok(Json(DataResponse {
        data: DeletedResponse {
            message: "News deleted successfully",
            id,
        },
    }))
}
