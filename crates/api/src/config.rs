/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Engagement score required before the social trigger posts.
    pub engagement_threshold: i32,
    /// Public site base URL used in article permalinks for social posts.
    pub site_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                 |
    /// |------------------------|-------------------------|
    /// | `HOST`                 | `0.0.0.0`               |
    /// | `PORT`                 | `3000`                  |
    /// | `CORS_ORIGINS`         | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                    |
    /// | `ENGAGEMENT_THRESHOLD` | `100`                   |
    /// | `SITE_BASE_URL`        | `http://localhost:5173` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let engagement_threshold: i32 = std::env::var("ENGAGEMENT_THRESHOLD")
            .unwrap_or_else(|_| plenario_core::news::DEFAULT_ENGAGEMENT_THRESHOLD.to_string())
            .parse()
            .expect("ENGAGEMENT_THRESHOLD must be a valid i32");

        let site_base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            engagement_threshold,
            site_base_url,
        }
    }
}
