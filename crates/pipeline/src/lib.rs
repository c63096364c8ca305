//! The news generation pipeline.
//!
//! [`pdf`] downloads proposition PDFs and extracts their text with a
//! two-strategy fallback. [`orchestrator`] sequences the whole flow for one
//! proposition (duplicate check → download → extract → upload → generate →
//! persist) and fans batches out behind a fixed-size semaphore.

pub mod orchestrator;
pub mod pdf;

pub use orchestrator::{BatchSummary, NewsOrchestrator, ProcessingOutcome};
pub use pdf::{ExtractedDocument, PdfError, PdfFetcher};
