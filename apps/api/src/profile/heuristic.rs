//! Heuristic extractor: builds a best-guess Bio from plain document lines.

use serde_json::{json, Value};
use tracing::debug;

use crate::profile::detectors::{
    clean_bullets, detect_email, detect_linkedin, detect_phone, looks_like_person_name,
    looks_like_title,
};
use crate::profile::model::{Bio, BioDraft, ExperienceItem, ValidationError, PLACEHOLDER_NAME};
use crate::profile::segmenter::{split_sections, SectionKey};

/// Only the top of the document is searched for the person's name.
const NAME_SCAN_LINES: usize = 6;

/// Experience entries are recorded as label / role / impact groups.
const EXPERIENCE_WINDOW: usize = 3;
const MIN_EXPERIENCE_WINDOW: usize = 2;

/// Name and title guessed from the document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub full_name: String,
    pub current_title: Option<String>,
}

/// First name-like line in the first six lines, plus the line after it as the
/// title when that line is not itself a person's name.
///
/// Lines made only of role vocabulary ("Senior Director") are never taken as
/// the name, and any line with role vocabulary qualifies as the title.
pub fn detect_headline<S: AsRef<str>>(lines: &[S]) -> Headline {
    for (i, line) in lines.iter().take(NAME_SCAN_LINES).enumerate() {
        let line: &str = line.as_ref();
        if !looks_like_person_name(line) {
            continue;
        }
        let current_title = lines
            .get(i + 1)
            .map(|next| next.as_ref().trim())
            .filter(|next| looks_like_title(next) || !looks_like_person_name(next))
            .map(String::from);
        return Headline {
            full_name: line.trim().to_string(),
            current_title,
        };
    }
    Headline {
        full_name: PLACEHOLDER_NAME.to_string(),
        current_title: None,
    }
}

/// Groups experience lines into label / role / impact windows.
///
/// Consumption stops at the first window holding fewer than two lines, so a
/// lone trailing line never becomes an entry.
pub fn group_experience<S: AsRef<str>>(lines: &[S]) -> Vec<ExperienceItem> {
    let mut items = Vec::new();
    for window in lines.chunks(EXPERIENCE_WINDOW) {
        if window.len() < MIN_EXPERIENCE_WINDOW {
            break;
        }
        let label: &str = window[0].as_ref();
        let role: &str = window[1].as_ref();
        let impact: Option<&str> = window.get(2).map(|l| l.as_ref());
        match ExperienceItem::from_parts(label, Some(role), impact) {
            Some(item) => items.push(item),
            None => debug!("skipping experience window with blank label"),
        }
    }
    items
}

fn experience_value(items: &[ExperienceItem]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| {
                json!({
                    "client_or_project": item.client_or_project,
                    "role": item.role,
                    "impact": item.impact,
                })
            })
            .collect(),
    )
}

/// Builds a draft from document lines without validating it.
pub fn draft_from_lines<S: AsRef<str>>(lines: &[S]) -> BioDraft {
    let lines: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
    let joined = lines.join("\n");

    let headline = detect_headline(&lines);
    let sections = split_sections(&lines);

    let summary = sections.lines(SectionKey::Summary).join(" ");
    let summary = summary.trim();

    let bullets = |key: SectionKey| Value::from(clean_bullets(sections.lines(key)));
    let experience = group_experience(sections.lines(SectionKey::Experience));

    debug!(
        full_name = %headline.full_name,
        experience = experience.len(),
        "heuristic headline and sections detected"
    );

    BioDraft {
        full_name: Value::from(headline.full_name),
        current_title: headline.current_title.map(Value::from).unwrap_or_default(),
        email: detect_email(&joined).map(Value::from).unwrap_or_default(),
        phone: detect_phone(&lines).map(Value::from).unwrap_or_default(),
        linkedin_url: detect_linkedin(&joined).map(Value::from).unwrap_or_default(),
        summary_paragraph: if summary.is_empty() {
            Value::Null
        } else {
            Value::from(summary)
        },
        expertise_bullets: bullets(SectionKey::Expertise),
        selected_experience: experience_value(&experience),
        education: bullets(SectionKey::Education),
        certifications: bullets(SectionKey::Certifications),
        affiliations: bullets(SectionKey::Affiliations),
        awards: bullets(SectionKey::Awards),
        ..BioDraft::default()
    }
}

/// Extracts a validated Bio from a document's non-empty lines.
pub fn parse_bio_from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Bio, ValidationError> {
    Bio::from_draft(draft_from_lines(lines))
}
