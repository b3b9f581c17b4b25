mod config;
mod documents;
mod errors;
mod llm_client;
mod profile;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, LlmBackend};
use crate::llm_client::ollama::OllamaClient;
use crate::llm_client::{LlmClient, TextCompletionService};
use crate::render::plan::load_plan;
use crate::routes::build_router;
use crate::state::{AppState, PromptSet};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("vitae_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the text completion backend
    let llm = build_llm(&config)?;
    info!(
        "LLM backend initialized ({}, model: {})",
        llm.backend_name(),
        config.extraction_model
    );

    let prompts = PromptSet::load(config.prompt_dir.as_deref());
    if let Some(dir) = &config.prompt_dir {
        info!("Prompt overrides read from {}", dir.display());
    }

    let default_plan = match &config.render_plan_path {
        Some(path) => {
            let plan = load_plan(path)
                .with_context(|| format!("failed to load render plan {}", path.display()))?;
            info!(
                "Default render plan loaded from {} ({} sections)",
                path.display(),
                plan.sections.len()
            );
            Some(Arc::new(plan))
        }
        None => None,
    };

    // Build app state
    let state = AppState {
        llm,
        config: config.clone(),
        prompts: Arc::new(prompts),
        default_plan,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_llm(config: &Config) -> Result<Arc<dyn TextCompletionService>> {
    Ok(match config.llm_backend {
        LlmBackend::Anthropic => {
            let key = config
                .anthropic_api_key
                .clone()
                .context("ANTHROPIC_API_KEY is required for the anthropic backend")?;
            Arc::new(LlmClient::new(key)?)
        }
        LlmBackend::Ollama => Arc::new(
            OllamaClient::new(&config.ollama_url)
                .with_context(|| format!("invalid OLLAMA_URL '{}'", config.ollama_url))?,
        ),
    })
}
