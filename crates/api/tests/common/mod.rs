use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use plenario_ai::{AiConfig, NewsGenerator};
use plenario_api::config::ServerConfig;
use plenario_api::routes;
use plenario_api::state::AppState;
use plenario_pipeline::NewsOrchestrator;
use plenario_social::{SocialClient, SocialConfig};
use plenario_storage::{StorageClient, StorageConfig};
use plenario_warehouse::{WarehouseClient, WarehouseConfig};

/// Build a test `ServerConfig` with safe defaults.
///
/// The engagement threshold is lowered to 2 so social-trigger tests do not
/// need to cast a hundred votes.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        engagement_threshold: 2,
        site_base_url: "http://localhost:5173".to_string(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// External clients are constructed unconfigured: the warehouse has no
/// project, the generator has no API key, and the social client has no
/// token. Endpoints that only touch the database behave exactly as in
/// production; endpoints that would call out fail fast instead.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let warehouse = Arc::new(
        WarehouseClient::new(WarehouseConfig {
            project_id: String::new(),
            base_url: "http://127.0.0.1:1".to_string(),
            access_token: None,
            credentials_path: None,
        })
        .expect("warehouse client"),
    );

    let storage = Arc::new(
        StorageClient::new(StorageConfig {
            bucket: "test-bucket".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: Some("http://127.0.0.1:1".to_string()),
            access_key: Some("test".to_string()),
            secret_key: Some("test".to_string()),
            public_base_url: None,
        })
        .await,
    );

    let generator = Arc::new(NewsGenerator::new(AiConfig {
        api_key: String::new(),
        model: "gpt-4o-mini".to_string(),
        base_url: "http://127.0.0.1:1".to_string(),
        output_retries: 1,
    }));

    let social = Arc::new(SocialClient::new(SocialConfig {
        access_token: None,
        api_base_url: "http://127.0.0.1:1".to_string(),
    }));

    let orchestrator = Arc::new(NewsOrchestrator::new(pool.clone(), storage, generator));

    let state = AppState {
        pool,
        config: Arc::new(config),
        orchestrator,
        warehouse,
        social,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send a GET request to the app.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body.
#[allow(dead_code)]
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with an empty body.
#[allow(dead_code)]
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PATCH request with a JSON body.
#[allow(dead_code)]
pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request to the app.
#[allow(dead_code)]
pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
