//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repository layer in `plenario_db`, the pipeline
//! orchestrator, or the external clients, and map errors via
//! [`crate::error::AppError`].

pub mod news;
pub mod propositions;
