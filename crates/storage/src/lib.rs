//! Object storage for proposition PDFs.
//!
//! Thin wrapper over an S3-compatible bucket: upload a PDF under a
//! deterministic key, resolve its public URL, delete it. Nothing here knows
//! about the pipeline; callers pass bytes and identifiers.

pub mod client;

pub use client::{StorageClient, StorageConfig, StorageError};
