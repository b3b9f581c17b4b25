//! Section segmenter: groups document lines under the headings they follow.
//!
//! # Rules
//! - A line whose letters-only, lower-cased form equals or starts with a known
//!   alias is a recognized heading: it moves the cursor and is not emitted.
//! - A short (≤3 token) ALL-CAPS or Title-Case line that matches no alias is an
//!   unrecognized heading: dropped, and the cursor stays where it was, so the
//!   lines after it keep accumulating under the previous section.
//! - Lines before the first recognized heading are discarded.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TITLE_CASE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]+)(\s[A-Z][a-z]+){0,2}$").unwrap());

const MAX_HEADING_TOKENS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Summary,
    Expertise,
    Experience,
    Education,
    Certifications,
    Affiliations,
    Awards,
}

impl SectionKey {
    /// All keys, in alias-matching priority order.
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Summary,
        SectionKey::Expertise,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Certifications,
        SectionKey::Affiliations,
        SectionKey::Awards,
    ];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SectionKey::Summary => &["summary", "profile", "about"],
            SectionKey::Expertise => &["expertise", "skills", "capabilities", "core competencies"],
            SectionKey::Experience => &[
                "experience",
                "selected experience",
                "professional experience",
                "engagements",
            ],
            SectionKey::Education => &["education", "academic"],
            SectionKey::Certifications => &["certifications", "licenses"],
            SectionKey::Affiliations => &["affiliations", "memberships"],
            SectionKey::Awards => &["awards", "recognition", "honors"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Summary => "summary",
            SectionKey::Expertise => "expertise",
            SectionKey::Experience => "experience",
            SectionKey::Education => "education",
            SectionKey::Certifications => "certifications",
            SectionKey::Affiliations => "affiliations",
            SectionKey::Awards => "awards",
        }
    }
}

/// How a single line is classified by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading(SectionKey),
    UnrecognizedHeading,
    Content,
}

/// Lines grouped by section. Every key is present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sections(BTreeMap<SectionKey, Vec<String>>);

impl Default for Sections {
    fn default() -> Self {
        Self(SectionKey::ALL.into_iter().map(|k| (k, Vec::new())).collect())
    }
}

impl Sections {
    pub fn lines(&self, key: SectionKey) -> &[String] {
        self.0.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn push(&mut self, key: SectionKey, line: &str) {
        self.0.entry(key).or_default().push(line.to_string());
    }
}

/// Letters and whitespace only, lower-cased and trimmed.
fn heading_base(line: &str) -> String {
    line.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_all_upper(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

pub fn classify_line(line: &str) -> LineKind {
    let base = heading_base(line);
    if !base.is_empty() {
        for key in SectionKey::ALL {
            if key
                .aliases()
                .iter()
                .any(|alias| base == *alias || base.starts_with(alias))
            {
                return LineKind::Heading(key);
            }
        }
    }

    let trimmed = line.trim();
    if trimmed.split_whitespace().count() <= MAX_HEADING_TOKENS
        && (is_all_upper(trimmed) || TITLE_CASE_HEADING_RE.is_match(trimmed))
    {
        return LineKind::UnrecognizedHeading;
    }

    LineKind::Content
}

/// Splits ordered lines into sections.
pub fn split_sections<S: AsRef<str>>(lines: &[S]) -> Sections {
    let mut sections = Sections::default();
    let mut cursor: Option<SectionKey> = None;

    for line in lines {
        let line: &str = line.as_ref();
        match classify_line(line) {
            LineKind::Heading(key) => cursor = Some(key),
            LineKind::UnrecognizedHeading => {}
            LineKind::Content => {
                if let Some(key) = cursor {
                    sections.push(key, line);
                }
            }
        }
    }

    sections
}
