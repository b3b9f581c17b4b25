//! Local Ollama backend (`POST /api/generate`, non-streaming).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::llm_client::{CompletionRequest, LlmError, ResponseFormat, TextCompletionService};

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default model for the Ollama backend when `EXTRACTION_MODEL` is unset.
pub const DEFAULT_OLLAMA_MODEL: &str = "gpt-oss:20b";
const CONTEXT_WINDOW: u32 = 8192;
// Local models on CPU are slow; the timeout is generous.
const REQUEST_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    generate_url: Url,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, LlmError> {
        let generate_url = Url::parse(base_url)?.join("api/generate")?;
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            generate_url,
        })
    }

    pub fn generate_url(&self) -> &Url {
        &self.generate_url
    }
}

fn generate_body(request: &CompletionRequest) -> GenerateRequest<'_> {
    GenerateRequest {
        model: &request.model,
        prompt: &request.prompt,
        stream: false,
        options: GenerateOptions {
            temperature: request.temperature,
            num_ctx: CONTEXT_WINDOW,
        },
        format: match request.format {
            ResponseFormat::Json => Some("json"),
            ResponseFormat::Text => None,
        },
    }
}

#[async_trait]
impl TextCompletionService for OllamaClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.generate_url.clone())
            .json(&generate_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response.json().await?;
        debug!(chars = body.response.len(), "ollama generate returned");
        Ok(body.response)
    }

    fn backend_name(&self) -> &'static str {
        "ollama"
    }
}
