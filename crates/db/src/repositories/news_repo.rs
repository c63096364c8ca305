//! Repository for the `news` table.

use sqlx::PgPool;

use plenario_core::news::VOTE_UPVOTE;
use plenario_core::types::{NewsId, PropositionId};

use crate::models::news::{CreateNews, News, NewsListFilter, NewsListItem};

/// Column list for full `news` queries.
const COLUMNS: &str = "\
    id, title, summary, full_content, proposition_number, proposition_id, \
    presentation_date, uf_author, author_name, party, author_type, news_type, \
    original_ementa, pdf_storage_url, original_pdf_url, upvotes, downvotes, \
    engagement_score, published_to_social, social_publish_date, \
    twitter_post_url, extra_metadata, created_at, updated_at";

/// Column list for list-view queries.
const LIST_COLUMNS: &str = "\
    id, title, summary, proposition_number, proposition_id, \
    presentation_date, uf_author, author_name, party, author_type, news_type, \
    upvotes, downvotes, engagement_score, published_to_social, created_at";

/// Provides CRUD operations for news articles.
pub struct NewsRepo;

impl NewsRepo {
    /// Insert a freshly generated news row, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateNews) -> Result<News, sqlx::Error> {
        let query = format!(
            "INSERT INTO news \
                (title, summary, full_content, proposition_number, proposition_id, \
                 presentation_date, uf_author, author_name, party, author_type, \
                 news_type, original_ementa, pdf_storage_url, original_pdf_url, \
                 extra_metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.full_content)
            .bind(&input.proposition_number)
            .bind(input.proposition_id)
            .bind(input.presentation_date)
            .bind(&input.uf_author)
            .bind(&input.author_name)
            .bind(&input.party)
            .bind(&input.author_type)
            .bind(&input.news_type)
            .bind(&input.original_ementa)
            .bind(&input.pdf_storage_url)
            .bind(&input.original_pdf_url)
            .bind(&input.extra_metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a news row by ID.
    pub async fn find_by_id(pool: &PgPool, id: NewsId) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE id = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a news row by the proposition it was generated from.
    ///
    /// Used for the duplicate check before the pipeline runs and by the
    /// index script's processed-lookup endpoint.
    pub async fn find_by_proposition_id(
        pool: &PgPool,
        proposition_id: PropositionId,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM news WHERE proposition_id = $1");
        sqlx::query_as::<_, News>(&query)
            .bind(proposition_id)
            .fetch_optional(pool)
            .await
    }

    /// List news with optional filters, whitelisted ordering, and
    /// page-based pagination. Returns the page of items plus the total
    /// row count for the filter.
    pub async fn list_filtered(
        pool: &PgPool,
        filter: &NewsListFilter,
        order_field: &str,
        order_dir: &str,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<NewsListItem>, i64), sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 1;

        if filter.uf.is_some() {
            conditions.push(format!("uf_author = ${param_idx}"));
            param_idx += 1;
        }
        if filter.news_type.is_some() {
            conditions.push(format!("news_type = ${param_idx}"));
            param_idx += 1;
        }
        if filter.keywords.is_some() {
            conditions.push(format!(
                "(title ILIKE ${param_idx} OR summary ILIKE ${param_idx})"
            ));
            param_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let keyword_pattern = filter.keywords.as_ref().map(|k| format!("%{k}%"));

        // Total count for the same filter, without pagination.
        let count_query = format!("SELECT COUNT(*) FROM news {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(uf) = &filter.uf {
            count_q = count_q.bind(uf);
        }
        if let Some(nt) = &filter.news_type {
            count_q = count_q.bind(nt);
        }
        if let Some(pattern) = &keyword_pattern {
            count_q = count_q.bind(pattern);
        }
        let total = count_q.fetch_one(pool).await?;

        // order_field/order_dir are resolved against a whitelist in core
        // before reaching this point; never pass user input directly.
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM news {where_clause} \
             ORDER BY {order_field} {order_dir} \
             LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut q = sqlx::query_as::<_, NewsListItem>(&query);
        if let Some(uf) = &filter.uf {
            q = q.bind(uf);
        }
        if let Some(nt) = &filter.news_type {
            q = q.bind(nt);
        }
        if let Some(pattern) = &keyword_pattern {
            q = q.bind(pattern);
        }
        q = q.bind(limit).bind(offset);

        let items = q.fetch_all(pool).await?;
        Ok((items, total))
    }

    /// Apply one vote and recompute the engagement score in the same
    /// statement, so concurrent votes cannot lose increments.
    ///
    /// `vote_type` must already be validated
    /// ([`plenario_core::news::validate_vote_type`]); anything that is not
    /// an upvote counts as a downvote here.
    pub async fn record_vote(
        pool: &PgPool,
        id: NewsId,
        vote_type: &str,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = if vote_type == VOTE_UPVOTE {
            format!(
                "UPDATE news SET \
                    upvotes = upvotes + 1, \
                    engagement_score = (upvotes + 1) - downvotes, \
                    updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            )
        } else {
            format!(
                "UPDATE news SET \
                    downvotes = downvotes + 1, \
                    engagement_score = upvotes - (downvotes + 1), \
                    updated_at = NOW() \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            )
        };
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a news row as published to social media, recording the post URL
    /// when one is available. Returns the updated row if found.
    pub async fn mark_published(
        pool: &PgPool,
        id: NewsId,
        post_url: Option<&str>,
    ) -> Result<Option<News>, sqlx::Error> {
        let query = format!(
            "UPDATE news SET \
                published_to_social = TRUE, \
                social_publish_date = NOW(), \
                twitter_post_url = COALESCE($2, twitter_post_url), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, News>(&query)
            .bind(id)
            .bind(post_url)
            .fetch_optional(pool)
            .await
    }

    /// Top news rows ordered by engagement score, highest first.
    pub async fn top_by_engagement(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<NewsListItem>, sqlx::Error> {
        let query = format!(
            "SELECT {LIST_COLUMNS} FROM news \
             ORDER BY engagement_score DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, NewsListItem>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a news row. Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: NewsId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
