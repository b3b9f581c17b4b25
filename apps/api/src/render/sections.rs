//! Section rendering strategies.
//!
//! Each strategy is a pure function from a Bio and a resolved section to the
//! paragraphs it emits. `strategy_for` looks the key up in `SECTION_STRATEGIES`;
//! keys not in the table use the generic fallback.

use serde::Serialize;

use crate::profile::model::Bio;
use crate::profile::segmenter::SectionKey;
use crate::render::plan::{HeaderLine, HeaderPlan, ResolvedSection};

const CONTACT_SEPARATOR: &str = " | ";
const EXPERIENCE_SEPARATOR: &str = " — ";

/// One paragraph to emit and the styles to try, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emission {
    pub text: String,
    pub styles: Vec<String>,
}

impl Emission {
    pub fn styled(text: impl Into<String>, style: &str) -> Self {
        Self {
            text: text.into(),
            styles: vec![style.to_string()],
        }
    }

    fn with_styles(text: impl Into<String>, styles: &[String]) -> Self {
        Self {
            text: text.into(),
            styles: styles.to_vec(),
        }
    }
}

pub type SectionStrategy = fn(&Bio, &ResolvedSection) -> Vec<Emission>;

pub const SECTION_STRATEGIES: [(SectionKey, SectionStrategy); 7] = [
    (SectionKey::Summary, narrative),
    (SectionKey::Expertise, expertise),
    (SectionKey::Experience, experience),
    (SectionKey::Education, education),
    (SectionKey::Certifications, certifications),
    (SectionKey::Affiliations, affiliations),
    (SectionKey::Awards, awards),
];

pub fn strategy_for(key: &str) -> SectionStrategy {
    SECTION_STRATEGIES
        .iter()
        .find(|(k, _)| k.as_str() == key)
        .map(|(_, strategy)| *strategy)
        .unwrap_or(fallback)
}

fn bullets(items: &[String], section: &ResolvedSection) -> Vec<Emission> {
    section
        .cap(items)
        .iter()
        .map(|item| Emission::with_styles(item.as_str(), &section.bullet_styles))
        .collect()
}

pub fn narrative(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bio.summary_paragraph
        .iter()
        .map(|summary| Emission::styled(summary.as_str(), &section.body_style))
        .collect()
}

fn expertise(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bullets(&bio.expertise_bullets, section)
}

fn education(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bullets(&bio.education, section)
}

fn certifications(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bullets(&bio.certifications, section)
}

fn affiliations(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bullets(&bio.affiliations, section)
}

fn awards(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bullets(&bio.awards, section)
}

/// `project — role` on a body line, then the impact as a single bullet.
pub fn experience(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    let mut out = Vec::new();
    for item in &bio.selected_experience {
        let line = match &item.role {
            Some(role) => format!("{}{EXPERIENCE_SEPARATOR}{role}", item.client_or_project),
            None => item.client_or_project.clone(),
        };
        out.push(Emission::styled(line, &section.body_style));
        if let Some(impact) = &item.impact {
            out.push(Emission::with_styles(impact.as_str(), &section.bullet_styles));
        }
    }
    out
}

/// Unknown keys render the same-named string-list field of the Bio, if any.
pub fn fallback(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    bio.list_field(&section.key)
        .map(|items| bullets(items, section))
        .unwrap_or_default()
}

/// `email | phone | link`, or nothing when all three are absent.
pub fn contact_line(bio: &Bio) -> Option<String> {
    let parts: Vec<&str> = [&bio.email, &bio.phone, &bio.linkedin_url]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .collect();
    (!parts.is_empty()).then(|| parts.join(CONTACT_SEPARATOR))
}

/// Identity and contact lines in `line_order`, skipping absent fields.
pub fn header(bio: &Bio, plan: &HeaderPlan) -> Vec<Emission> {
    plan.line_order()
        .iter()
        .filter_map(|line| {
            let text = match line {
                HeaderLine::Name => Some(bio.full_name.clone()),
                HeaderLine::Title => bio.current_title.clone(),
                HeaderLine::DepartmentOrPractice => bio.department_or_practice.clone(),
                HeaderLine::Location => bio.location.clone(),
                HeaderLine::Contact => contact_line(bio),
                HeaderLine::Unknown => None,
            }?;
            Some(Emission::styled(text, plan.style_for(*line)))
        })
        .collect()
}

/// Heading plus the section body produced by the strategy for its key.
pub fn section(bio: &Bio, section: &ResolvedSection) -> Vec<Emission> {
    let mut out = vec![Emission::styled(section.label.as_str(), &section.heading_style)];
    out.extend(strategy_for(&section.key)(bio, section));
    out
}
