//! News entity model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use plenario_core::types::{NewsId, PropositionId, Timestamp};

/// A full row from the `news` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct News {
    pub id: NewsId,
    // AI-generated content.
    pub title: String,
    pub summary: String,
    pub full_content: String,
    // Original proposition data.
    pub proposition_number: String,
    pub proposition_id: PropositionId,
    pub presentation_date: NaiveDate,
    // Proposition author.
    pub uf_author: Option<String>,
    pub author_name: Option<String>,
    pub party: Option<String>,
    pub author_type: Option<String>,
    // Classification.
    pub news_type: String,
    pub original_ementa: String,
    // PDF storage.
    pub pdf_storage_url: String,
    pub original_pdf_url: String,
    // Engagement and voting.
    pub upvotes: i32,
    pub downvotes: i32,
    pub engagement_score: i32,
    // Social publication.
    pub published_to_social: bool,
    pub social_publish_date: Option<Timestamp>,
    pub twitter_post_url: Option<String>,
    // Tags, impact level, extraction stats.
    pub extra_metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Trimmed-down row for list views: everything except the article body,
/// ementa, PDF URLs, and metadata blob.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsListItem {
    pub id: NewsId,
    pub title: String,
    pub summary: String,
    pub proposition_number: String,
    pub proposition_id: PropositionId,
    pub presentation_date: NaiveDate,
    pub uf_author: Option<String>,
    pub author_name: Option<String>,
    pub party: Option<String>,
    pub author_type: Option<String>,
    pub news_type: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub engagement_score: i32,
    pub published_to_social: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a freshly generated news row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNews {
    pub title: String,
    pub summary: String,
    pub full_content: String,
    pub proposition_number: String,
    pub proposition_id: PropositionId,
    pub presentation_date: NaiveDate,
    pub uf_author: Option<String>,
    pub author_name: Option<String>,
    pub party: Option<String>,
    pub author_type: Option<String>,
    pub news_type: String,
    pub original_ementa: String,
    pub pdf_storage_url: String,
    pub original_pdf_url: String,
    pub extra_metadata: Option<serde_json::Value>,
}

/// Filters accepted by the news listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct NewsListFilter {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub uf: Option<String>,
    pub news_type: Option<String>,
    /// Case-insensitive substring match against title and summary.
    pub keywords: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}
