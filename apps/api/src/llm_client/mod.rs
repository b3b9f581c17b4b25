//! LLM Client: text-completion capability and its backends.
//!
//! The core never talks to a model vendor directly. Extraction and style
//! planning depend on `TextCompletionService`; the backend is chosen once at
//! startup from `LLM_BACKEND` and injected through `AppState`.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod json;
pub mod ladder;
pub mod ollama;
pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Default model for the Anthropic backend when `EXTRACTION_MODEL` is unset.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Output shape requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Schema-constrained: the backend is asked to emit a JSON object only.
    Json,
    /// Free text; the prompt alone carries the formatting instructions.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub format: ResponseFormat,
}

/// Narrow text-completion capability. Implementations return the raw model
/// text; parsing and retry strategy belong to the caller (see `ladder`).
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Backend label for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic Messages API
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic-backed completion service.
/// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
        })
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: Option<&str>,
        model: &str,
        temperature: f32,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            temperature,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextCompletionService for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        // The Messages API has no JSON mode; the system prompt stands in for it.
        let system = match request.format {
            ResponseFormat::Json => Some(prompts::JSON_ONLY_SYSTEM),
            ResponseFormat::Text => None,
        };
        let response = self
            .call(&request.prompt, system, &request.model, request.temperature)
            .await?;
        response
            .text()
            .map(String::from)
            .ok_or(LlmError::EmptyContent)
    }

    fn backend_name(&self) -> &'static str {
        "anthropic"
    }
}
