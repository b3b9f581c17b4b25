//! Per-field normalizers for the Bio record.
//!
//! Every function here is pure and total except `normalize_email` and
//! `normalize_linkedin_url`, which reject values that break a record invariant.
//! The record constructor in `model.rs` composes these in phase 1.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use phonenumber::{country, Mode};
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::profile::model::ValidationError;

const DEFAULT_PHONE_REGION: country::Id = country::Id::US;

/// Tokens that are always rendered fully upper-case in names and titles.
pub const ACRONYMS: &[&str] = &[
    "AI", "ML", "NLP", "LLM", "R&D", "SQL", "BI", "M&A", "ESG", "CFA", "CPA", "AWS", "GCP", "GPU",
    "API", "CEO", "CIO", "CTO",
];

/// Bullets with more words than this are compressed to their first clause.
pub const WORD_LIMIT_BULLET: usize = 16;

/// Host substring a profile link must carry.
pub const PROFESSIONAL_NETWORK_HOST: &str = "linkedin.com";

/// Clause separators used by the bullet compression rule.
const CLAUSE_SEPARATORS: &[char] = &[';', '–', '—'];

/// Leading characters stripped from list items.
const LIST_ITEM_PREFIX: &[char] = &['•', '-', '\t', ' '];

fn is_acronym(token: &str) -> bool {
    let upper = token.to_uppercase();
    ACRONYMS.contains(&upper.as_str())
}

/// True when the token has at least one cased character and no lower-case ones.
fn is_all_upper(token: &str) -> bool {
    token.chars().any(|c| c.is_uppercase()) && !token.chars().any(|c| c.is_lowercase())
}

fn capitalize_first(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Collapses every run of whitespace into a single space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-collapsed text, or `None` when nothing is left.
pub fn compact_optional(s: &str) -> Option<String> {
    let compact = collapse_whitespace(s);
    if compact.is_empty() {
        None
    } else {
        Some(compact)
    }
}

/// Reads an optional free-text field. Non-string values degrade to absent.
pub fn optional_text(value: &Value) -> Option<String> {
    value.as_str().and_then(compact_optional)
}

pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Capitalizes each name token, upper-casing known acronyms.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| {
            if is_acronym(token) {
                token.to_uppercase()
            } else {
                capitalize_first(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-cases a job title while keeping separators and role abbreviations intact.
///
/// Tokens are split on whitespace, `-` and `/`; the separators are emitted
/// unchanged. Acronyms are upper-cased, short all-caps tokens such as "SVP"
/// are kept, everything else gets a capitalized first letter.
pub fn smart_title(raw: &str) -> String {
    let text = collapse_whitespace(raw);
    let mut out = String::with_capacity(text.len());
    let mut token = String::new();

    let flush = |token: &mut String, out: &mut String| {
        if token.is_empty() {
            return;
        }
        if is_acronym(token) {
            out.push_str(&token.to_uppercase());
        } else if is_all_upper(token) && token.chars().count() <= 3 {
            out.push_str(token);
        } else {
            out.push_str(&capitalize_first(token));
        }
        token.clear();
    };

    for c in text.chars() {
        if c.is_whitespace() || c == '-' || c == '/' {
            flush(&mut token, &mut out);
            out.push(c);
        } else {
            token.push(c);
        }
    }
    flush(&mut token, &mut out);
    out
}

/// Validates an email address. Blank input is treated as absent.
pub fn normalize_email(value: &Value) -> Result<Option<String>, ValidationError> {
    static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
        )
        .unwrap()
    });

    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim(),
        other => {
            return Err(ValidationError::InvalidEmail {
                value: other.to_string(),
            })
        }
    };
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.contains("..") || !EMAIL_RE.is_match(raw) {
        return Err(ValidationError::InvalidEmail {
            value: raw.to_string(),
        });
    }
    Ok(Some(raw.to_string()))
}

/// Validates a professional-network profile link.
///
/// A link without a scheme is read as `https://`. The parsed host must contain
/// `linkedin.com`; anything else is rejected rather than dropped.
pub fn normalize_linkedin_url(value: &Value) -> Result<Option<String>, ValidationError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim(),
        other => {
            return Err(ValidationError::NotProfessionalNetwork {
                value: other.to_string(),
            })
        }
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let parsed = match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}")),
        Err(e) => Err(e),
    };

    let rejected = || ValidationError::NotProfessionalNetwork {
        value: raw.to_string(),
    };
    let url = parsed.map_err(|_| rejected())?;
    let host = url.host_str().unwrap_or("").to_ascii_lowercase();
    if !host.contains(PROFESSIONAL_NETWORK_HOST) {
        return Err(rejected());
    }
    Ok(Some(url.as_str().to_string()))
}

/// Keeps only digits and `+`.
pub fn strip_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Normalizes a phone number, never failing.
///
/// The number is parsed with the US as the default region; a valid number is
/// rendered in its national format. Anything that fails to parse or validate
/// keeps the digit/plus-stripped form.
pub fn normalize_phone(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let stripped = strip_phone(&raw);
    if stripped.is_empty() {
        return None;
    }
    match phonenumber::parse(Some(DEFAULT_PHONE_REGION), raw.trim()) {
        Ok(number) if phonenumber::is_valid(&number) => {
            Some(number.format().mode(Mode::National).to_string())
        }
        _ => Some(stripped),
    }
}

/// Cleans a list field: accepts a single string or an array of strings,
/// collapses whitespace, strips a leading bullet/dash/tab, drops non-strings
/// and empties, and deduplicates case-insensitively in first-seen order.
pub fn normalize_list(value: &Value) -> Vec<String> {
    let items: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(arr) => arr.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    let cleaned = items.into_iter().filter_map(|item| {
        let compact = collapse_whitespace(item);
        let stripped = compact.trim_start_matches(LIST_ITEM_PREFIX).trim();
        (!stripped.is_empty()).then(|| stripped.to_string())
    });

    dedupe_case_insensitive(cleaned)
}

pub fn dedupe_case_insensitive(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Soft compression: a bullet over the word limit is cut at its first
/// `;`, `–` or `—`. Applied once; bullets within the limit are untouched.
pub fn compress_bullet(bullet: &str) -> String {
    let text = collapse_whitespace(bullet);
    if word_count(&text) <= WORD_LIMIT_BULLET {
        return text;
    }
    let first = text
        .split(CLAUSE_SEPARATORS)
        .next()
        .map(str::trim)
        .unwrap_or("");
    if first.is_empty() {
        text
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_name_capitalizes_tokens() {
        assert_eq!(normalize_name("  jane   doe "), "Jane Doe");
    }

    #[test]
    fn test_normalize_name_keeps_rest_of_token() {
        assert_eq!(normalize_name("mary mcDonald"), "Mary McDonald");
    }

    #[test]
    fn test_normalize_name_upper_cases_acronyms() {
        assert_eq!(normalize_name("cfa jane doe"), "CFA Jane Doe");
    }

    #[test]
    fn test_smart_title_handles_separators_and_acronyms() {
        assert_eq!(
            smart_title("senior managing director, ai/ml"),
            "Senior Managing Director, AI/ML"
        );
    }

    #[test]
    fn test_smart_title_keeps_short_caps() {
        assert_eq!(smart_title("SVP of data"), "SVP Of Data");
    }

    #[test]
    fn test_smart_title_preserves_hyphens() {
        assert_eq!(smart_title("co-founder"), "Co-Founder");
    }

    #[test]
    fn test_compact_optional_empty_is_none() {
        assert_eq!(compact_optional("   \t "), None);
        assert_eq!(compact_optional(" Boston,\n MA "), Some("Boston, MA".to_string()));
    }

    #[test]
    fn test_email_valid() {
        assert_eq!(
            normalize_email(&json!("jane.doe@example.com")).unwrap(),
            Some("jane.doe@example.com".to_string())
        );
    }

    #[test]
    fn test_email_blank_is_absent() {
        assert_eq!(normalize_email(&json!("  ")).unwrap(), None);
        assert_eq!(normalize_email(&Value::Null).unwrap(), None);
    }

    #[test]
    fn test_email_malformed_fails() {
        let err = normalize_email(&json!("jane.doe@")).unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn test_linkedin_accepts_profile() {
        let out = normalize_linkedin_url(&json!("http://linkedin.com/in/jdoe")).unwrap();
        assert_eq!(out, Some("http://linkedin.com/in/jdoe".to_string()));
    }

    #[test]
    fn test_linkedin_accepts_www_and_missing_scheme() {
        assert!(normalize_linkedin_url(&json!("https://www.linkedin.com/in/jdoe"))
            .unwrap()
            .is_some());
        assert_eq!(
            normalize_linkedin_url(&json!("linkedin.com/in/jdoe")).unwrap(),
            Some("https://linkedin.com/in/jdoe".to_string())
        );
    }

    #[test]
    fn test_linkedin_rejects_other_hosts() {
        let err = normalize_linkedin_url(&json!("http://example.com/in/jdoe")).unwrap_err();
        assert_eq!(err.field(), "linkedin_url");
    }

    #[test]
    fn test_phone_formats_us_national() {
        assert_eq!(
            normalize_phone(&json!("+1 (617) 555-0100")),
            Some("(617) 555-0100".to_string())
        );
        assert_eq!(
            normalize_phone(&json!("617.555.0100")),
            Some("(617) 555-0100".to_string())
        );
    }

    #[test]
    fn test_phone_international_numbers_use_national_format() {
        assert_eq!(
            normalize_phone(&json!("+44 20 7946 0958")),
            Some("020 7946 0958".to_string())
        );
        assert_eq!(
            normalize_phone(&json!("+33 1 42 68 53 00")),
            Some("01 42 68 53 00".to_string())
        );
    }

    #[test]
    fn test_phone_unparseable_keeps_stripped_digits() {
        assert_eq!(normalize_phone(&json!("ext 12")), Some("12".to_string()));
        assert_eq!(normalize_phone(&json!("+1 555")), Some("+1555".to_string()));
    }

    #[test]
    fn test_phone_without_digits_is_absent() {
        assert_eq!(normalize_phone(&json!("n/a")), None);
        assert_eq!(normalize_phone(&Value::Null), None);
    }

    #[test]
    fn test_list_dedupes_case_insensitively() {
        assert_eq!(
            normalize_list(&json!(["AI", "ai", "ML"])),
            vec!["AI".to_string(), "ML".to_string()]
        );
    }

    #[test]
    fn test_list_accepts_single_string_and_drops_junk() {
        assert_eq!(normalize_list(&json!("• Pricing")), vec!["Pricing".to_string()]);
        assert_eq!(
            normalize_list(&json!(["- a  b", 3, null, "  ", "\tc"])),
            vec!["a b".to_string(), "c".to_string()]
        );
        assert!(normalize_list(&json!({"k": "v"})).is_empty());
    }

    #[test]
    fn test_compress_bullet_under_limit_untouched() {
        let bullet = "GenAI solutions; prompt engineering; governance frameworks for LLMs";
        assert_eq!(compress_bullet(bullet), bullet);
    }

    #[test]
    fn test_compress_bullet_over_limit_cut_at_separator() {
        let bullet = "Led enterprise analytics transformation for regional banks — delivered \
                      forecasting, pricing and risk platforms across twelve business units";
        assert!(word_count(bullet) > WORD_LIMIT_BULLET);
        assert_eq!(
            compress_bullet(bullet),
            "Led enterprise analytics transformation for regional banks"
        );
    }

    #[test]
    fn test_compress_bullet_fires_once() {
        let bullet = "one two three four five six seven eight nine ten eleven twelve \
                      thirteen fourteen fifteen sixteen seventeen eighteen; nineteen; twenty";
        let once = compress_bullet(bullet);
        assert_eq!(
            once,
            "one two three four five six seven eight nine ten eleven twelve thirteen \
             fourteen fifteen sixteen seventeen eighteen"
        );
        assert!(word_count(&once) <= word_count(bullet.split(';').next().unwrap()));
    }

    #[test]
    fn test_compress_bullet_without_separator_keeps_text() {
        let bullet = "a b c d e f g h i j k l m n o p q r";
        assert_eq!(compress_bullet(bullet), bullet);
    }
}
