//! Stateless field detectors run over raw document lines.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::normalize::strip_phone;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.\-+]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?linkedin\.com/[A-Za-z0-9\-_/]+").unwrap()
});

static PHONE_GROUPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}.*\d{3}.*\d{4}").unwrap());

static PHONE_INTL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+\d{7,}").unwrap());

static CAPITALIZED_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z\-]+$").unwrap());

const MIN_PHONE_LINE_CHARS: usize = 8;
const MIN_PHONE_DIGITS: usize = 10;

const BULLET_GLYPHS: &[char] = &['•', '-', '*', '·'];

/// Words that mark a line as a job title rather than a person's name.
const ROLE_WORDS: &[&str] = &[
    "advisor", "analyst", "architect", "associate", "chair", "chief", "consultant", "counsel",
    "director", "engineer", "executive", "fellow", "founder", "head", "lead", "managing",
    "manager", "officer", "partner", "president", "principal", "professor", "scientist", "senior",
    "specialist", "strategist", "vice",
];

/// First email address in the text, left to right.
pub fn detect_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First linkedin.com URL in the text, case-insensitive.
pub fn detect_linkedin(text: &str) -> Option<String> {
    LINKEDIN_RE.find(text).map(|m| m.as_str().to_string())
}

/// First line that reads like a phone number, stripped to digits and `+`.
///
/// A line qualifies with three digit groups (3/3/4) or a `+` followed by at
/// least seven digits, and is only accepted with ten or more digits.
pub fn detect_phone<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines.iter().find_map(|line| {
        let line: &str = line.as_ref();
        if line.chars().count() < MIN_PHONE_LINE_CHARS {
            return None;
        }
        if !PHONE_GROUPS_RE.is_match(line) && !PHONE_INTL_RE.is_match(line) {
            return None;
        }
        let stripped = strip_phone(line);
        let digits = stripped.chars().filter(char::is_ascii_digit).count();
        (digits >= MIN_PHONE_DIGITS).then_some(stripped)
    })
}

/// Whether a line reads like a person's name.
///
/// Two to five tokens, of which at least `max(2, n - 1)` are capitalized
/// words. One odd token (an initial, a particle) is tolerated.
pub fn looks_like_name(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if !(2..=5).contains(&tokens.len()) {
        return false;
    }
    let capitalized = tokens
        .iter()
        .filter(|t| CAPITALIZED_WORD_RE.is_match(t))
        .count();
    capitalized >= 2.max(tokens.len() - 1)
}

/// Whether a line carries job-title vocabulary ("Senior Director", "Partner").
pub fn looks_like_title(line: &str) -> bool {
    word_tokens(line).any(is_role_word)
}

/// Whether every word of the line is job-title vocabulary ("Managing Partner").
pub fn is_role_phrase(line: &str) -> bool {
    let mut words = word_tokens(line).peekable();
    words.peek().is_some() && words.all(is_role_word)
}

/// A name-like line that is not purely a job title.
///
/// Surnames that double as role words ("Jonathan Head", "Amy Lead") still
/// qualify; only lines made entirely of role words are rejected.
pub fn looks_like_person_name(line: &str) -> bool {
    looks_like_name(line) && !is_role_phrase(line)
}

fn word_tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}

fn is_role_word(token: &str) -> bool {
    ROLE_WORDS.contains(&token.to_lowercase().as_str())
}

/// Strips one leading bullet glyph from each line and drops blank results.
pub fn clean_bullets<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    raw.iter()
        .filter_map(|line| {
            let line: &str = line.as_ref();
            let line = line.trim();
            let stripped = line.strip_prefix(BULLET_GLYPHS).unwrap_or(line).trim();
            (!stripped.is_empty()).then(|| stripped.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_email_first_match() {
        let text = "Contact: jane.doe@example.com or jd@other.org";
        assert_eq!(detect_email(text).as_deref(), Some("jane.doe@example.com"));
    }

    #[test]
    fn test_detect_email_requires_tld() {
        assert_eq!(detect_email("user@localhost"), None);
        assert_eq!(detect_email("no address here"), None);
    }

    #[test]
    fn test_detect_linkedin_case_insensitive() {
        let text = "Profile: HTTPS://WWW.LinkedIn.com/in/jane-doe, more text";
        assert_eq!(
            detect_linkedin(text).as_deref(),
            Some("HTTPS://WWW.LinkedIn.com/in/jane-doe")
        );
    }

    #[test]
    fn test_detect_linkedin_ignores_other_hosts() {
        assert_eq!(detect_linkedin("https://example.com/in/jane"), None);
    }

    #[test]
    fn test_detect_phone_grouped() {
        let lines = ["Jane Doe", "Tel: (617) 555-0100"];
        assert_eq!(detect_phone(&lines).as_deref(), Some("6175550100"));
    }

    #[test]
    fn test_detect_phone_international() {
        let lines = ["Mobile +442079460958"];
        assert_eq!(detect_phone(&lines).as_deref(), Some("+442079460958"));
    }

    #[test]
    fn test_detect_phone_rejects_short_digit_runs() {
        // Matches the `+` pattern but carries fewer than ten digits.
        let lines = ["Call +1234567 now"];
        assert_eq!(detect_phone(&lines), None);
        let short = ["555-0100"];
        assert_eq!(detect_phone(&short), None);
    }

    #[test]
    fn test_detect_phone_first_qualifying_line_wins() {
        let lines = ["617-555-0100", "212-555-0199"];
        assert_eq!(detect_phone(&lines).as_deref(), Some("6175550100"));
    }

    #[test]
    fn test_looks_like_name() {
        assert!(looks_like_name("Jane Doe"));
        assert!(looks_like_name("John Q. Public"));
        assert!(looks_like_name("Mary-anne van Buren"));
        assert!(!looks_like_name("Jane"));
        assert!(!looks_like_name("Senior director of analytics"));
        assert!(!looks_like_name("One Two Three Four Five Six"));
    }

    #[test]
    fn test_title_vocabulary() {
        assert!(looks_like_name("Senior Director"));
        assert!(looks_like_title("Senior Director"));
        assert!(!looks_like_person_name("Senior Director"));
        assert!(looks_like_person_name("Jane Doe"));
        assert!(looks_like_title("Co-Founder & CEO"));
        assert!(!looks_like_title("Leadership Forum"));
    }

    #[test]
    fn test_role_word_surnames_are_names() {
        assert!(looks_like_person_name("Jonathan Head"));
        assert!(looks_like_person_name("Amy Lead"));
        assert!(looks_like_person_name("Grace Partner"));
        assert!(is_role_phrase("Managing Partner"));
        assert!(!looks_like_person_name("Managing Director"));
        assert!(!is_role_phrase(""));
    }

    #[test]
    fn test_clean_bullets_strips_one_glyph() {
        let raw = ["• Pricing", "- Forecasting", "* Risk", "· Audit", "-- Double", "•", "Plain"];
        assert_eq!(
            clean_bullets(&raw),
            vec!["Pricing", "Forecasting", "Risk", "Audit", "- Double", "Plain"]
        );
    }

    #[test]
    fn test_clean_bullets_idempotent() {
        let raw = ["• Responsible AI", "GenAI Strategy"];
        let once = clean_bullets(&raw);
        assert_eq!(clean_bullets(&once), once);
    }
}
