// Shared prompt fragments for the completion ladder.
// Task prompts (bio extraction, render planning) live next to the code that uses them.

use std::path::Path;

use tracing::{debug, warn};

/// System prompt that enforces JSON-only output on backends without a JSON mode.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Prepended to the task prompt on the second ladder step.
pub const REINFORCED_PREFIX: &str =
    "Return ONLY a JSON object. No explanations, no backticks, no extra keys.\n";

/// Builds the third-step prompt asking the model to repair its previous output.
pub fn repair_prompt(last_raw: &str) -> String {
    format!(
        "Convert the following into VALID JSON only. Keep keys as in the schema. \
         No commentary, no code fences.\n-----\n{last_raw}\n-----"
    )
}

/// Reads `<dir>/<file_name>` when present, otherwise returns the built-in default.
pub fn load_prompt(dir: Option<&Path>, file_name: &str, default: &str) -> String {
    let Some(dir) = dir else {
        return default.to_string();
    };
    let path = dir.join(file_name);
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            debug!(path = %path.display(), "using prompt override");
            text
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => default.to_string(),
        Err(e) => {
            warn!(path = %path.display(), "prompt override unreadable, using default: {e}");
            default.to_string()
        }
    }
}
