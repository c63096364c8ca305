use std::sync::Arc;

use plenario_pipeline::NewsOrchestrator;
use plenario_social::SocialClient;
use plenario_warehouse::WarehouseClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: plenario_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// News generation pipeline orchestrator.
    pub orchestrator: Arc<NewsOrchestrator>,
    /// Analytical warehouse client (proposition listings).
    pub warehouse: Arc<WarehouseClient>,
    /// Social posting client (publish trigger).
    pub social: Arc<SocialClient>,
}
