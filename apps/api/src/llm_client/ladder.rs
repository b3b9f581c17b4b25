//! Structured-output retry ladder.
//!
//! Three ordered steps, each a (prompt transform, response format, parser):
//! 1. strict: task prompt, schema-constrained JSON format
//! 2. reinforced: task prompt behind an explicit JSON-only prefix, free text
//! 3. repair: the previous raw output wrapped in a fixer prompt
//!
//! The first step whose output parses wins. Steps run sequentially; a
//! transport error on one step advances to the next.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::json::{parse_json_loose, JsonRecoveryError};
use crate::llm_client::prompts::{repair_prompt, REINFORCED_PREFIX};
use crate::llm_client::{CompletionRequest, LlmError, ResponseFormat, TextCompletionService};

#[derive(Debug, Error)]
pub enum LadderError {
    /// Every step failed before any model output was received.
    #[error("text completion service failed: {0}")]
    Service(#[from] LlmError),

    /// Output was received but none of it parsed.
    #[error("no structured data found after {attempts} attempts")]
    NoStructuredDataFound { attempts: usize, last_raw: String },
}

/// Model settings shared by every step of one ladder run.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderSettings {
    pub model: String,
    pub temperature: f32,
}

pub struct LadderStep {
    pub name: &'static str,
    pub format: ResponseFormat,
    transform: fn(&str, &str) -> String,
    parse: fn(&str) -> Result<Value, JsonRecoveryError>,
}

impl LadderStep {
    /// Builds this step's prompt from the task prompt and the previous raw output.
    pub fn prompt(&self, task_prompt: &str, last_raw: &str) -> String {
        (self.transform)(task_prompt, last_raw)
    }

    pub fn parse(&self, raw: &str) -> Result<Value, JsonRecoveryError> {
        (self.parse)(raw)
    }
}

fn strict_prompt(task_prompt: &str, _last_raw: &str) -> String {
    task_prompt.to_string()
}

fn reinforced_prompt(task_prompt: &str, _last_raw: &str) -> String {
    format!("{REINFORCED_PREFIX}{task_prompt}")
}

fn repair_step_prompt(_task_prompt: &str, last_raw: &str) -> String {
    repair_prompt(last_raw)
}

pub const JSON_LADDER: [LadderStep; 3] = [
    LadderStep {
        name: "strict",
        format: ResponseFormat::Json,
        transform: strict_prompt,
        parse: parse_json_loose,
    },
    LadderStep {
        name: "reinforced",
        format: ResponseFormat::Text,
        transform: reinforced_prompt,
        parse: parse_json_loose,
    },
    LadderStep {
        name: "repair",
        format: ResponseFormat::Text,
        transform: repair_step_prompt,
        parse: parse_json_loose,
    },
];

/// Runs `steps` in order against `service`, returning the first parsed value.
pub async fn run_ladder(
    service: &dyn TextCompletionService,
    steps: &[LadderStep],
    task_prompt: &str,
    settings: &LadderSettings,
) -> Result<Value, LadderError> {
    let mut last_raw = String::new();
    let mut received_output = false;
    let mut last_service_error: Option<LlmError> = None;

    for step in steps {
        let request = CompletionRequest {
            prompt: step.prompt(task_prompt, &last_raw),
            model: settings.model.clone(),
            temperature: settings.temperature,
            format: step.format,
        };

        let raw = match service.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(step = step.name, "completion failed: {e}");
                last_service_error = Some(e);
                continue;
            }
        };
        received_output = true;

        match step.parse(&raw) {
            Ok(value) => {
                debug!(step = step.name, "structured output parsed");
                return Ok(value);
            }
            Err(e) => {
                warn!(step = step.name, "model output did not parse: {e}");
                last_raw = raw;
            }
        }
    }

    match last_service_error {
        Some(e) if !received_output => Err(LadderError::Service(e)),
        _ => Err(LadderError::NoStructuredDataFound {
            attempts: steps.len(),
            last_raw,
        }),
    }
}

/// Runs the standard three-step JSON ladder.
pub async fn complete_json(
    service: &dyn TextCompletionService,
    task_prompt: &str,
    settings: &LadderSettings,
) -> Result<Value, LadderError> {
    run_ladder(service, &JSON_LADDER, task_prompt, settings).await
}
