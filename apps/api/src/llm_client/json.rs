//! Loose JSON recovery for model output and hand-edited files.
//!
//! Models wrap JSON in code fences, prepend prose, or leave trailing commas.
//! Recovery tries, in order: direct parse, fence stripping, the first
//! balanced `{…}` block with trailing commas removed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

static TRAILING_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum JsonRecoveryError {
    #[error("no JSON object found in text")]
    NotFound,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// The first balanced `{…}` block, ignoring braces inside string literals.
pub fn first_object_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn remove_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_RE.replace_all(text, "$1").into_owned()
}

/// Parses model output into a JSON value, tolerating fences, prose and trailing commas.
pub fn parse_json_loose(text: &str) -> Result<Value, JsonRecoveryError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let cleaned = strip_json_fences(text);
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Ok(value);
    }

    let block = first_object_block(cleaned).ok_or(JsonRecoveryError::NotFound)?;
    Ok(serde_json::from_str(&remove_trailing_commas(block))?)
}

/// Parses a JSON document read from disk: a leading BOM is dropped and the
/// loose recovery rules apply.
pub fn parse_json_document(text: &str) -> Result<Value, JsonRecoveryError> {
    parse_json_loose(text.trim_start_matches(BOM).trim())
}
