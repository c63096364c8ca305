//! Handlers for proposition listings from the analytical warehouse.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use plenario_core::news::validate_uf;
use plenario_warehouse::PropositionFilter;

use crate::error::AppResult;
use crate::query::PropositionParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /propositions
// ---------------------------------------------------------------------------

/// List propositions with optional keyword/UF/kind filters.
///
/// Runs the parameterized warehouse query; results are ordered by
/// legislative year, newest first.
pub async fn list_propositions(
    State(state): State<AppState>,
    Query(params): Query<PropositionParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref uf) = params.uf {
        validate_uf(uf)?;
    }

    let filter = PropositionFilter {
        keywords: params.keywords,
        uf: params.uf,
        kind: params.kind,
        page: params.page.unwrap_or(1),
        per_page: params.per_page.unwrap_or(20),
    };

    let propositions = state.warehouse.list_propositions(&filter).await?;

    tracing::info!(count = propositions.len(), "Propositions listed");
    Ok(Json(DataResponse { data: propositions }))
}
