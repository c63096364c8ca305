//! REST client for the warehouse query endpoint.
//!
//! Runs the proposition listing query with named query parameters and
//! decodes the response rows into [`Proposition`] records.

use serde::{Deserialize, Serialize};

use plenario_core::proposition::Proposition;

use crate::auth::{AuthError, ServiceAccountKey, TokenProvider};
use crate::rows::{RowDecodeError, TableRow, TableSchema};

/// Base query shipped with the crate; filters are appended as
/// parameterized clauses.
const BASE_QUERY: &str = include_str!("../queries/get_propositions.sql");

/// Synchronous query timeout requested from the warehouse.
const QUERY_TIMEOUT_MS: u64 = 30_000;

/// Default page size for proposition listings.
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Warehouse connection settings.
///
/// | Env Var                          | Default                                       |
/// |----------------------------------|-----------------------------------------------|
/// | `WAREHOUSE_PROJECT_ID`           | (required)                                    |
/// | `WAREHOUSE_BASE_URL`             | `https://bigquery.googleapis.com/bigquery/v2` |
/// | `WAREHOUSE_ACCESS_TOKEN`         | (unset)                                       |
/// | `GOOGLE_APPLICATION_CREDENTIALS` | (unset)                                       |
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// Billing project the query jobs run under.
    pub project_id: String,
    /// REST API base URL.
    pub base_url: String,
    /// Static bearer token (overrides the service-account flow).
    pub access_token: Option<String>,
    /// Path to a service-account key file.
    pub credentials_path: Option<String>,
}

impl WarehouseConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            project_id: std::env::var("WAREHOUSE_PROJECT_ID").unwrap_or_default(),
            base_url: std::env::var("WAREHOUSE_BASE_URL")
                .unwrap_or_else(|_| "https://bigquery.googleapis.com/bigquery/v2".into()),
            access_token: std::env::var("WAREHOUSE_ACCESS_TOKEN").ok(),
            credentials_path: std::env::var("GOOGLE_APPLICATION_CREDENTIALS").ok(),
        }
    }
}

/// Filters for the proposition listing.
#[derive(Debug, Clone, Default)]
pub struct PropositionFilter {
    /// Case-insensitive substring match against the keyword column.
    pub keywords: Option<String>,
    /// Author state (UF) code.
    pub uf: Option<String>,
    /// Proposition kind acronym (PL, PEC, ...).
    pub kind: Option<String>,
    /// 1-indexed page.
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

/// Errors from the warehouse client.
#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("Warehouse project is not configured: set WAREHOUSE_PROJECT_ID")]
    NotConfigured,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Warehouse API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Query did not complete within {QUERY_TIMEOUT_MS} ms")]
    Incomplete,

    #[error("Failed to decode response rows: {0}")]
    Decode(#[from] RowDecodeError),

    #[error("Row did not match the proposition record shape: {0}")]
    Shape(#[from] serde_json::Error),
}

// ---- request/response payloads ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    query: String,
    use_legacy_sql: bool,
    parameter_mode: &'static str,
    query_parameters: Vec<QueryParameter>,
    timeout_ms: u64,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    name: String,
    parameter_type: ParameterType,
    parameter_value: ParameterValue,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParameterType {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParameterValue {
    value: String,
}

impl QueryParameter {
    fn string(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType { kind: "STRING" },
            parameter_value: ParameterValue {
                value: value.into(),
            },
        }
    }

    fn int64(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType { kind: "INT64" },
            parameter_value: ParameterValue {
                value: value.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    job_complete: Option<bool>,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
}

/// Build the final query text and its named parameters for a filter.
///
/// Filters become parameterized `AND` clauses on the base query; ordering
/// and pagination are always applied.
pub fn build_query(filter: &PropositionFilter) -> (String, Vec<QueryParameter>) {
    let mut query = BASE_QUERY.trim_end().to_string();
    let mut params = Vec::new();

    if let Some(keywords) = &filter.keywords {
        query.push_str("\nAND LOWER(prop.palavra_chave) LIKE @keywords");
        params.push(QueryParameter::string(
            "keywords",
            format!("%{}%", keywords.to_lowercase()),
        ));
    }
    if let Some(uf) = &filter.uf {
        query.push_str("\nAND autor.sigla_uf_autor = @uf");
        params.push(QueryParameter::string("uf", uf.clone()));
    }
    if let Some(kind) = &filter.kind {
        query.push_str("\nAND prop.sigla = @kind");
        params.push(QueryParameter::string("kind", kind.clone()));
    }

    let per_page = if filter.per_page > 0 {
        filter.per_page
    } else {
        DEFAULT_PAGE_SIZE
    };
    let page = filter.page.max(1);

    query.push_str("\nORDER BY ano DESC\nLIMIT @page_size OFFSET @offset");
    params.push(QueryParameter::int64("page_size", per_page));
    params.push(QueryParameter::int64("offset", (page - 1) * per_page));

    (query, params)
}

/// HTTP client for the warehouse query endpoint.
pub struct WarehouseClient {
    http: reqwest::Client,
    config: WarehouseConfig,
    tokens: TokenProvider,
}

impl WarehouseClient {
    /// Create a client from configuration, loading the service-account key
    /// file when one is configured.
    pub fn new(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        let key = match &config.credentials_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    WarehouseError::Auth(AuthError::InvalidKey(format!(
                        "cannot read {path}: {e}"
                    )))
                })?;
                let key: ServiceAccountKey = serde_json::from_str(&raw).map_err(|e| {
                    WarehouseError::Auth(AuthError::InvalidKey(format!(
                        "cannot parse {path}: {e}"
                    )))
                })?;
                Some(key)
            }
            None => None,
        };

        Ok(Self {
            http: reqwest::Client::new(),
            tokens: TokenProvider::new(config.access_token.clone(), key),
            config,
        })
    }

    /// List propositions matching the filter, newest legislative year first.
    pub async fn list_propositions(
        &self,
        filter: &PropositionFilter,
    ) -> Result<Vec<Proposition>, WarehouseError> {
        if self.config.project_id.is_empty() {
            return Err(WarehouseError::NotConfigured);
        }

        let (query, query_parameters) = build_query(filter);
        let token = self.tokens.bearer_token().await?;

        let url = format!(
            "{}/projects/{}/queries",
            self.config.base_url, self.config.project_id
        );
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&QueryRequest {
                query,
                use_legacy_sql: false,
                parameter_mode: "NAMED",
                query_parameters,
                timeout_ms: QUERY_TIMEOUT_MS,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(WarehouseError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<QueryResponse>().await?;
        if payload.job_complete != Some(true) {
            return Err(WarehouseError::Incomplete);
        }

        let Some(schema) = payload.schema else {
            // A complete job with no schema means an empty result set.
            return Ok(Vec::new());
        };

        let objects = crate::rows::rows_to_objects(&schema, &payload.rows)?;
        let propositions = objects
            .into_iter()
            .map(serde_json::from_value::<Proposition>)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            count = propositions.len(),
            page = filter.page,
            "Propositions fetched from warehouse"
        );
        Ok(propositions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
