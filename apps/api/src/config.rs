use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::llm_client::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::llm_client::DEFAULT_ANTHROPIC_MODEL;

const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_SOURCE_CHAR_LIMIT: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Anthropic,
    Ollama,
}

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub llm_backend: LlmBackend,
    /// Required only for the Anthropic backend.
    pub anthropic_api_key: Option<String>,
    pub ollama_url: String,
    pub extraction_model: String,
    pub extraction_temperature: f32,
    /// Source text is cut to this many characters before prompting.
    pub source_char_limit: usize,
    /// Optional directory holding `extract_schema.txt` / `render_plan.txt` overrides.
    pub prompt_dir: Option<PathBuf>,
    /// Plan used by `/api/v1/render` when a request carries none.
    pub render_plan_path: Option<PathBuf>,
    /// When set, every rendered document is also saved here as `<request_id>.json`.
    pub render_output_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = get("LLM_BACKEND").map(|v| v.trim().to_lowercase());
        let llm_backend = match backend.as_deref() {
            None | Some("anthropic") => LlmBackend::Anthropic,
            Some("ollama") => LlmBackend::Ollama,
            Some(other) => bail!("LLM_BACKEND must be 'anthropic' or 'ollama', got '{other}'"),
        };

        let anthropic_api_key = match llm_backend {
            LlmBackend::Anthropic => Some(require(&get, "ANTHROPIC_API_KEY")?),
            LlmBackend::Ollama => get("ANTHROPIC_API_KEY"),
        };

        let default_model = match llm_backend {
            LlmBackend::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            LlmBackend::Ollama => DEFAULT_OLLAMA_MODEL,
        };

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm_backend,
            anthropic_api_key,
            ollama_url: get("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
            extraction_model: get("EXTRACTION_MODEL").unwrap_or_else(|| default_model.to_string()),
            extraction_temperature: match get("EXTRACTION_TEMPERATURE") {
                Some(v) => v
                    .parse::<f32>()
                    .context("EXTRACTION_TEMPERATURE must be a number")?,
                None => DEFAULT_TEMPERATURE,
            },
            source_char_limit: match get("SOURCE_CHAR_LIMIT") {
                Some(v) => v
                    .parse::<usize>()
                    .context("SOURCE_CHAR_LIMIT must be a non-negative integer")?,
                None => DEFAULT_SOURCE_CHAR_LIMIT,
            },
            prompt_dir: get("PROMPT_DIR").map(PathBuf::from),
            render_plan_path: get("RENDER_PLAN_PATH").map(PathBuf::from),
            render_output_dir: get("RENDER_OUTPUT_DIR").map(PathBuf::from),
        })
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
