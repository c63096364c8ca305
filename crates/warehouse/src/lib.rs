//! Client for the analytical data warehouse (BigQuery REST API).
//!
//! Propositions live in the warehouse, not in our database; this crate runs
//! the parameterized listing query and decodes the REST row format into
//! [`plenario_core::proposition::Proposition`] records.

pub mod auth;
pub mod client;
pub mod rows;

pub use client::{PropositionFilter, WarehouseClient, WarehouseConfig, WarehouseError};
