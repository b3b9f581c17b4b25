//! Model-backed extraction: prompt → retry ladder → reconciler → Bio.

use thiserror::Error;
use tracing::info;

use crate::llm_client::ladder::{complete_json, LadderError, LadderSettings};
use crate::llm_client::TextCompletionService;
use crate::profile::model::{Bio, ValidationError};
use crate::profile::prompts::BIO_PLACEHOLDER;
use crate::profile::reconcile::reconcile;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no source text to extract from")]
    EmptySource,

    #[error(transparent)]
    Ladder(#[from] LadderError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    pub prompt_template: String,
    pub ladder: LadderSettings,
    pub source_char_limit: usize,
}

/// The first `limit` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_prompt(template: &str, source_text: &str) -> String {
    template.replace(BIO_PLACEHOLDER, source_text)
}

/// Extracts a Bio from free text through the completion service.
///
/// Only the prompt sees the truncated text; name repair in the reconciler
/// scans the full source.
pub async fn extract_with_model(
    service: &dyn TextCompletionService,
    settings: &ExtractionSettings,
    source_text: &str,
) -> Result<Bio, ExtractionError> {
    if source_text.trim().is_empty() {
        return Err(ExtractionError::EmptySource);
    }

    let excerpt = truncate_chars(source_text, settings.source_char_limit);
    let prompt = build_prompt(&settings.prompt_template, excerpt);

    info!(
        backend = service.backend_name(),
        model = %settings.ladder.model,
        source_chars = excerpt.chars().count(),
        "extracting bio with model"
    );

    let payload = complete_json(service, &prompt, &settings.ladder).await?;
    Ok(reconcile(&payload, source_text)?)
}
