//! Orchestrates the full generation pipeline for propositions.
//!
//! One proposition flows through: duplicate check → PDF download → text
//! extraction → storage upload → article generation → persistence. Batches
//! fan out the same flow behind a fixed-size semaphore; a failing item never
//! aborts its batch.

use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::Semaphore;

use plenario_ai::{AiError, NewsGenerator};
use plenario_core::news::ArticleMetadata;
use plenario_core::proposition::{parse_presentation_date, Proposition};
use plenario_core::types::NewsId;
use plenario_db::models::news::CreateNews;
use plenario_db::repositories::NewsRepo;
use plenario_storage::{StorageClient, StorageError};

use crate::pdf::{self, PdfError, PdfFetcher};

/// Result of processing one proposition.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_id: Option<NewsId>,
    pub proposition_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingOutcome {
    fn created(proposition_id: i64, news_id: NewsId, title: String) -> Self {
        Self {
            success: true,
            news_id: Some(news_id),
            proposition_id,
            title: Some(title),
            message: None,
            error: None,
        }
    }

    fn already_processed(proposition_id: i64, news_id: NewsId) -> Self {
        Self {
            success: true,
            news_id: Some(news_id),
            proposition_id,
            title: None,
            message: Some("Already processed".to_string()),
            error: None,
        }
    }

    fn failed(proposition_id: i64, error: String) -> Self {
        Self {
            success: false,
            news_id: None,
            proposition_id,
            title: None,
            message: None,
            error: Some(error),
        }
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProcessingOutcome>,
}

impl BatchSummary {
    fn from_results(results: Vec<ProcessingOutcome>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            results,
        }
    }
}

/// Internal pipeline error; flattened into [`ProcessingOutcome::failed`]
/// before leaving the orchestrator.
#[derive(Debug, thiserror::Error)]
enum PipelineError {
    #[error(transparent)]
    Pdf(#[from] PdfError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Sequences the generation pipeline over external services.
pub struct NewsOrchestrator {
    pool: PgPool,
    fetcher: PdfFetcher,
    storage: Arc<StorageClient>,
    generator: Arc<NewsGenerator>,
}

impl NewsOrchestrator {
    pub fn new(pool: PgPool, storage: Arc<StorageClient>, generator: Arc<NewsGenerator>) -> Self {
        Self {
            pool,
            fetcher: PdfFetcher::new(),
            storage,
            generator,
        }
    }

    /// Run the full pipeline for one proposition, catching every failure
    /// into the outcome so batch callers can keep going.
    pub async fn process_proposition(&self, proposition: &Proposition) -> ProcessingOutcome {
        tracing::info!(
            proposition_id = proposition.id,
            reference = %proposition.reference(),
            "Processing proposition"
        );

        match self.run_pipeline(proposition).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    proposition_id = proposition.id,
                    error = %e,
                    "Proposition processing failed"
                );
                ProcessingOutcome::failed(proposition.id, e.to_string())
            }
        }
    }

    async fn run_pipeline(
        &self,
        proposition: &Proposition,
    ) -> Result<ProcessingOutcome, PipelineError> {
        // 1. Skip propositions that already have news.
        if let Some(existing) = NewsRepo::find_by_proposition_id(&self.pool, proposition.id).await?
        {
            tracing::info!(
                proposition_id = proposition.id,
                news_id = %existing.id,
                "News already exists, skipping"
            );
            return Ok(ProcessingOutcome::already_processed(
                proposition.id,
                existing.id,
            ));
        }

        // 2. Download the proposition PDF.
        let pdf_bytes = self.fetcher.download(&proposition.content_url).await?;

        // 3. Extract text on a blocking thread; parsing is CPU-bound.
        let bytes_for_extraction = pdf_bytes.clone();
        let extracted =
            tokio::task::spawn_blocking(move || pdf::extract_text(&bytes_for_extraction))
                .await
                .map_err(|e| PipelineError::Task(e.to_string()))??;

        // 4. Upload the PDF to object storage.
        let pdf_storage_url = self
            .storage
            .upload_pdf(
                pdf_bytes.to_vec(),
                proposition.id,
                &proposition.storage_filename(),
                Some(proposition.year),
            )
            .await?;

        // 5. Generate the article draft.
        let draft = self.generator.generate(&extracted.text, proposition).await?;

        // 6. Persist the news row.
        let metadata = ArticleMetadata {
            tags: draft.tags.clone(),
            impact_level: draft.impact_level.as_str().to_string(),
            target_audience: draft.target_audience.clone(),
            pdf_pages: extracted.pages,
            word_count: extracted.word_count,
        };

        let presentation_date = parse_presentation_date(
            proposition.presentation_date.as_deref(),
            chrono::Utc::now().date_naive(),
        );

        let input = CreateNews {
            title: draft.title,
            summary: draft.summary,
            full_content: draft.full_content,
            proposition_number: proposition.reference(),
            proposition_id: proposition.id,
            presentation_date,
            uf_author: proposition.author_uf.clone(),
            author_name: proposition.author_name.clone(),
            party: proposition.author_party.clone(),
            author_type: proposition.author_type.clone(),
            news_type: proposition.kind.clone(),
            original_ementa: proposition.summary.clone().unwrap_or_default(),
            pdf_storage_url,
            original_pdf_url: proposition.content_url.clone(),
            extra_metadata: serde_json::to_value(&metadata).ok(),
        };

        let created = match NewsRepo::create(&self.pool, &input).await {
            Ok(news) => news,
            // A concurrent run may have inserted the same proposition
            // between the duplicate check and this insert.
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                if let Some(existing) =
                    NewsRepo::find_by_proposition_id(&self.pool, proposition.id).await?
                {
                    return Ok(ProcessingOutcome::already_processed(
                        proposition.id,
                        existing.id,
                    ));
                }
                return Err(PipelineError::Database(sqlx::Error::Database(db_err)));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            proposition_id = proposition.id,
            news_id = %created.id,
            title = %created.title,
            "News created"
        );

        Ok(ProcessingOutcome::created(
            proposition.id,
            created.id,
            created.title,
        ))
    }

    /// Process a batch of propositions with bounded parallelism.
    ///
    /// At most `max_concurrent` pipelines run at once; the rest wait on the
    /// semaphore. Results come back in input order.
    pub async fn batch_process(
        &self,
        propositions: Vec<Proposition>,
        max_concurrent: usize,
    ) -> BatchSummary {
        tracing::info!(
            count = propositions.len(),
            max_concurrent,
            "Starting batch processing"
        );

        let semaphore = Semaphore::new(max_concurrent.max(1));

        let tasks = propositions.iter().map(|proposition| {
            let semaphore = &semaphore;
            async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                self.process_proposition(proposition).await
            }
        });

        let results = futures::future::join_all(tasks).await;
        let summary = BatchSummary::from_results(results);

        tracing::info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            "Batch processing complete"
        );
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
