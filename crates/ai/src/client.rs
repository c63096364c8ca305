//! Chat-completions client producing structured article drafts.

use serde::{Deserialize, Serialize};

use plenario_core::proposition::Proposition;

use crate::prompts;

/// Maximum title length accepted from the model (matches the column width).
const MAX_TITLE_CHARS: usize = 500;

/// Maximum number of tags accepted from the model.
const MAX_TAGS: usize = 5;

/// Generator settings.
///
/// | Env Var             | Default                     |
/// |---------------------|-----------------------------|
/// | `OPENAI_API_KEY`    | (required)                  |
/// | `AI_MODEL`          | `gpt-4o-mini`               |
/// | `AI_BASE_URL`       | `https://api.openai.com/v1` |
/// | `AI_OUTPUT_RETRIES` | `3`                         |
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// How many times an invalid response may be regenerated.
    pub output_retries: u32,
}

impl AiConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into()),
            base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            output_retries: std::env::var("AI_OUTPUT_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }
}

/// Article impact classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
        }
    }
}

/// Structured article draft returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDraft {
    pub title: String,
    pub summary: String,
    pub full_content: String,
    pub tags: Vec<String>,
    pub impact_level: ImpactLevel,
    pub target_audience: Vec<String>,
}

impl NewsDraft {
    /// Check the constraints the schema cannot fully express.
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(format!("title exceeds {MAX_TITLE_CHARS} characters"));
        }
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        if self.full_content.trim().is_empty() {
            return Err("full_content is empty".to_string());
        }
        if self.tags.len() > MAX_TAGS {
            return Err(format!("more than {MAX_TAGS} tags"));
        }
        Ok(())
    }
}

/// Errors from the article generator.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Generator is not configured: set OPENAI_API_KEY")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Model API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Model returned no usable output after {attempts} attempts: {last_error}")]
    InvalidOutput { attempts: u32, last_error: String },
}

// ---- request/response payloads ----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// JSON schema the model output must satisfy (strict mode).
fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": "news_article",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "summary": { "type": "string" },
                    "full_content": { "type": "string" },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" }
                    },
                    "impact_level": {
                        "type": "string",
                        "enum": ["low", "medium", "high"]
                    },
                    "target_audience": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                },
                "required": [
                    "title", "summary", "full_content",
                    "tags", "impact_level", "target_audience"
                ],
                "additionalProperties": false
            }
        }
    })
}

/// Client for the article generation model.
pub struct NewsGenerator {
    http: reqwest::Client,
    config: AiConfig,
}

impl NewsGenerator {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Generate an article draft from extracted PDF text and proposition
    /// metadata.
    ///
    /// Output that fails schema parsing or draft validation is regenerated
    /// up to `output_retries` times; transport and API errors abort
    /// immediately.
    pub async fn generate(
        &self,
        document_text: &str,
        proposition: &Proposition,
    ) -> Result<NewsDraft, AiError> {
        if self.config.api_key.is_empty() {
            return Err(AiError::NotConfigured);
        }

        let prompt = prompts::build_article_prompt(document_text, proposition);
        let attempts = self.config.output_retries.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            let content = self.complete(&prompt).await?;

            match serde_json::from_str::<NewsDraft>(&content) {
                Ok(draft) => match draft.validate() {
                    Ok(()) => {
                        tracing::info!(
                            proposition_id = proposition.id,
                            attempt,
                            "Article draft generated"
                        );
                        return Ok(draft);
                    }
                    Err(reason) => {
                        tracing::warn!(
                            proposition_id = proposition.id,
                            attempt,
                            reason = %reason,
                            "Draft failed validation, regenerating"
                        );
                        last_error = reason;
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        proposition_id = proposition.id,
                        attempt,
                        error = %e,
                        "Draft was not valid JSON, regenerating"
                    );
                    last_error = e.to_string();
                }
            }
        }

        Err(AiError::InvalidOutput {
            attempts,
            last_error,
        })
    }

    /// One chat-completions round trip, returning the raw message content.
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: response_schema(),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response.json::<ChatResponse>().await?;
        Ok(payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
