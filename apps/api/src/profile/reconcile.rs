//! External-source reconciler: coerces a model-generated payload into a Bio.
//!
//! The upstream generator is uncontrolled: keys go missing, lists arrive as
//! prose, experience arrives as a bare object or as plain strings. Everything
//! is coerced into the shape `Bio::from_draft` expects before validation.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::profile::detectors::looks_like_person_name;
use crate::profile::model::{Bio, BioDraft, ValidationError, LIST_FIELDS, PLACEHOLDER_NAME};

/// How many non-empty source lines are searched when the payload has no name.
const NAME_REPAIR_SCAN_LINES: usize = 8;

const PIECE_TRIM: &[char] = &[' ', '•', '-', '\t'];

/// Copies the recognized keys of an arbitrary payload onto the empty template.
/// Non-object payloads yield the bare template.
pub fn draft_from_payload(payload: &Value) -> BioDraft {
    match payload {
        Value::Object(map) => {
            // Unknown keys are ignored; missing keys stay null.
            serde_json::from_value(Value::Object(map.clone())).unwrap_or_else(|e| {
                debug!("payload did not map onto the template: {e}");
                BioDraft::default()
            })
        }
        _ => BioDraft::default(),
    }
}

fn is_blank_name(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// First person-name line among the first eight non-empty source lines.
pub fn repair_name(source_text: &str) -> Option<String> {
    source_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_REPAIR_SCAN_LINES)
        .find(|l| looks_like_person_name(l))
        .map(String::from)
}

/// Splits a prose list on `;`, newlines, or a comma followed by a capital letter.
pub fn split_list_string(s: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    for chunk in s.split(|c| c == ';' || c == '\n') {
        let mut start = 0;
        let mut chars = chunk.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != ',' {
                continue;
            }
            // Skip the whitespace run after the comma, then require a capital.
            let mut j = i + c.len_utf8();
            let mut saw_space = false;
            while let Some(&(k, next)) = chars.peek() {
                if next.is_whitespace() {
                    saw_space = true;
                    chars.next();
                    j = k + next.len_utf8();
                } else {
                    break;
                }
            }
            if saw_space && chunk[j..].chars().next().is_some_and(char::is_uppercase) {
                pieces.push(&chunk[start..i]);
                start = j;
            }
        }
        pieces.push(&chunk[start..]);
    }

    pieces
        .into_iter()
        .map(|p| p.trim_matches(PIECE_TRIM))
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn coerce_list(value: &mut Value) {
    match value {
        Value::String(s) => {
            let items = split_list_string(s);
            *value = Value::from(items);
        }
        Value::Null => *value = Value::Array(Vec::new()),
        _ => {}
    }
}

fn text_or_null(map: &Map<String, Value>, key: &str) -> Value {
    match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Value::String(s.clone()),
        _ => Value::Null,
    }
}

fn normalize_experience_entry(item: &Value) -> Option<Value> {
    match item {
        Value::Object(map) => {
            let label = map
                .get("client_or_project")
                .and_then(Value::as_str)
                .unwrap_or("")
                .trim();
            Some(json!({
                "client_or_project": label,
                "role": text_or_null(map, "role"),
                "impact": text_or_null(map, "impact"),
            }))
        }
        Value::String(label) => Some(json!({
            "client_or_project": label.trim(),
            "role": null,
            "impact": null,
        })),
        _ => None,
    }
}

fn coerce_experience(value: &Value) -> Value {
    match value {
        Value::Object(_) => Value::Array(normalize_experience_entry(value).into_iter().collect()),
        Value::Array(items) => {
            Value::Array(items.iter().filter_map(normalize_experience_entry).collect())
        }
        _ => Value::Array(Vec::new()),
    }
}

/// Coerces a payload into a draft and fills gaps from the source text.
pub fn reconcile_draft(payload: &Value, source_text: &str) -> BioDraft {
    let mut draft = draft_from_payload(payload);

    if is_blank_name(&draft.full_name) {
        let repaired = repair_name(source_text);
        debug!(repaired = ?repaired, "payload has no full_name, scanning source text");
        draft.full_name = Value::from(repaired.unwrap_or_else(|| PLACEHOLDER_NAME.to_string()));
    }

    for key in LIST_FIELDS {
        if let Some(value) = draft.list_field_mut(key) {
            coerce_list(value);
        }
    }

    draft.selected_experience = coerce_experience(&draft.selected_experience);
    draft
}

/// Produces a validated Bio from an arbitrary payload and its source text.
pub fn reconcile(payload: &Value, source_text: &str) -> Result<Bio, ValidationError> {
    Bio::from_draft(reconcile_draft(payload, source_text))
}
