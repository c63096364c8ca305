//! X API v2 client.

use serde::Deserialize;
use tokio::sync::OnceCell;

/// Social posting settings.
///
/// | Env Var          | Default                 |
/// |------------------|-------------------------|
/// | `X_ACCESS_TOKEN` | (unset — posting off)   |
/// | `X_API_BASE_URL` | `https://api.x.com/2`   |
///
/// The token is an OAuth2 user-context access token with write scope.
/// Without one the client reports itself unconfigured and the publish
/// trigger skips posting.
#[derive(Debug, Clone)]
pub struct SocialConfig {
    pub access_token: Option<String>,
    pub api_base_url: String,
}

impl SocialConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            access_token: std::env::var("X_ACCESS_TOKEN").ok(),
            api_base_url: std::env::var("X_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.x.com/2".into()),
        }
    }
}

/// Errors from the social posting layer.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("Social client is not configured: set X_ACCESS_TOKEN")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Social API error ({status}): {body}")]
    Api { status: u16, body: String },
}

// ---- response payloads ----

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    data: MeData,
}

#[derive(Debug, Deserialize)]
struct MeData {
    username: String,
}

/// Client for creating posts on the configured account.
pub struct SocialClient {
    http: reqwest::Client,
    config: SocialConfig,
    /// Username of the authenticated account, resolved once per process.
    username: OnceCell<String>,
}

impl SocialClient {
    pub fn new(config: SocialConfig) -> Self {
        if config.access_token.is_none() {
            tracing::warn!("Social credentials not configured, posting disabled");
        }
        Self {
            http: reqwest::Client::new(),
            config,
            username: OnceCell::new(),
        }
    }

    /// Whether posting is possible.
    pub fn is_configured(&self) -> bool {
        self.config.access_token.is_some()
    }

    /// Create a post and return its public URL.
    pub async fn create_post(&self, text: &str) -> Result<String, SocialError> {
        let token = self
            .config
            .access_token
            .as_deref()
            .ok_or(SocialError::NotConfigured)?;

        let response = self
            .http
            .post(format!("{}/tweets", self.config.api_base_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if status.as_u16() == 403 {
                tracing::error!(
                    "Social API returned 403, the app likely lacks write access"
                );
            }
            return Err(SocialError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let created = response.json::<CreatePostResponse>().await?;
        let username = self.username(token).await?;
        let url = format!("https://x.com/{username}/status/{}", created.data.id);

        tracing::info!(post_url = %url, "Posted to social");
        Ok(url)
    }

    /// Resolve and cache the authenticated account's username.
    async fn username(&self, token: &str) -> Result<String, SocialError> {
        let username = self
            .username
            .get_or_try_init(|| async {
                let response = self
                    .http
                    .get(format!("{}/users/me", self.config.api_base_url))
                    .bearer_auth(token)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "<unreadable body>".to_string());
                    return Err(SocialError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }

                Ok::<_, SocialError>(response.json::<MeResponse>().await?.data.username)
            })
            .await?;

        Ok(username.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
