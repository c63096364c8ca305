//! PDF download and text extraction.
//!
//! Downloads retry a bounded number of times; extraction tries the
//! layout-aware extractor first and falls back to a plain content-stream
//! walk when the document trips it up.

use std::time::Duration;

use bytes::Bytes;

/// Total request timeout per download attempt.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// TCP connect timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Download attempts before giving up.
const MAX_DOWNLOAD_ATTEMPTS: u32 = 3;

/// Bodies smaller than this with a non-PDF content type are rejected as
/// error pages rather than documents.
const MIN_PLAUSIBLE_BYTES: usize = 100;

/// Errors from the PDF layer.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Download failed after {attempts} attempts: {last_error}")]
    Download { attempts: u32, last_error: String },

    #[error("Response does not look like a PDF (content type {content_type}, {size} bytes)")]
    NotAPdf { content_type: String, size: usize },

    #[error("Text extraction failed: {0}")]
    Extraction(String),
}

/// Extracted text plus the stats recorded in the news metadata.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: usize,
    pub word_count: usize,
}

/// Heuristic check that a downloaded body is actually a PDF.
///
/// Accepts anything whose content type mentions PDF; otherwise the body
/// must at least be larger than a trivial error page.
pub fn plausible_pdf(content_type: &str, body: &[u8]) -> bool {
    content_type.to_lowercase().contains("pdf") || body.len() >= MIN_PLAUSIBLE_BYTES
}

/// Downloads proposition PDFs over HTTP.
pub struct PdfFetcher {
    http: reqwest::Client,
}

impl Default for PdfFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfFetcher {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build PDF HTTP client");
        Self { http }
    }

    /// Download a PDF, retrying transient failures.
    pub async fn download(&self, url: &str) -> Result<Bytes, PdfError> {
        let mut last_error = String::new();

        for attempt in 1..=MAX_DOWNLOAD_ATTEMPTS {
            tracing::info!(url, attempt, "Downloading PDF");

            match self.try_download(url).await {
                Ok(bytes) => {
                    tracing::info!(url, size = bytes.len(), "PDF downloaded");
                    return Ok(bytes);
                }
                Err(e) => {
                    tracing::warn!(url, attempt, error = %e, "Download attempt failed");
                    last_error = e;
                }
            }
        }

        Err(PdfError::Download {
            attempts: MAX_DOWNLOAD_ATTEMPTS,
            last_error,
        })
    }

    /// One download attempt. Returns the failure reason as text so the
    /// retry loop can fold it into [`PdfError::Download`].
    async fn try_download(&self, url: &str) -> Result<Bytes, String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await.map_err(|e| e.to_string())?;

        if !plausible_pdf(&content_type, &body) {
            return Err(PdfError::NotAPdf {
                content_type,
                size: body.len(),
            }
            .to_string());
        }

        Ok(body)
    }
}

/// Extract text from a PDF, preferring the layout-aware extractor and
/// falling back to a raw content-stream walk.
///
/// CPU-bound; the orchestrator runs it on a blocking thread.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedDocument, PdfError> {
    match extract_with_pdf_extract(bytes) {
        Ok(document) => Ok(document),
        Err(e) => {
            tracing::warn!(error = %e, "Primary extraction failed, trying fallback");
            extract_with_lopdf(bytes)
        }
    }
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<ExtractedDocument, PdfError> {
    let text =
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| PdfError::Extraction(e.to_string()))?;

    // Page count comes from the document catalog either way.
    let pages = lopdf::Document::load_mem(bytes)
        .map(|doc| doc.get_pages().len())
        .unwrap_or(0);

    Ok(document_from_text(text, pages))
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<ExtractedDocument, PdfError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| PdfError::Extraction(e.to_string()))?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let pages = page_numbers.len();
    let text = doc
        .extract_text(&page_numbers)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    Ok(document_from_text(text, pages))
}

fn document_from_text(text: String, pages: usize) -> ExtractedDocument {
    let word_count = text.split_whitespace().count();
    tracing::info!(pages, word_count, "Text extracted from PDF");
    ExtractedDocument {
        text,
        pages,
        word_count,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
