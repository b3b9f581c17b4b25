//! Render plan: declarative description of styles and ordering.
//!
//! Every field is optional on the wire. Missing or null style names fall back
//! to the header defaults, the legacy `styles` block, then the built-in
//! section defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::documents::{read_json_file, ReadError};
use crate::llm_client::ladder::LadderError;

pub const DEFAULT_NAME_STYLE: &str = "Heading 1";
pub const DEFAULT_TITLE_STYLE: &str = "Subtitle";
pub const DEFAULT_BODY_STYLE: &str = "Normal";
pub const DEFAULT_HEADING_STYLE: &str = "Heading 2";
/// Tried in order when a section names no bullet style.
pub const BULLET_STYLE_CANDIDATES: [&str; 3] = ["List Bullet", "List Paragraph", "Normal"];

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("render plan does not match the expected shape: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("render plan has no 'sections' list")]
    MissingSections,

    #[error(transparent)]
    Ladder(#[from] LadderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLine {
    Name,
    Title,
    DepartmentOrPractice,
    Location,
    Contact,
    /// Entries this renderer does not know are skipped.
    #[serde(other)]
    Unknown,
}

pub const DEFAULT_LINE_ORDER: [HeaderLine; 5] = [
    HeaderLine::Name,
    HeaderLine::Title,
    HeaderLine::DepartmentOrPractice,
    HeaderLine::Location,
    HeaderLine::Contact,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderPlan {
    pub name_style: Option<String>,
    pub title_style: Option<String>,
    pub department_style: Option<String>,
    pub location_style: Option<String>,
    pub contact_style: Option<String>,
    pub line_order: Option<Vec<HeaderLine>>,
}

impl HeaderPlan {
    pub fn line_order(&self) -> &[HeaderLine] {
        self.line_order.as_deref().unwrap_or(&DEFAULT_LINE_ORDER)
    }

    pub fn style_for(&self, line: HeaderLine) -> &str {
        let (style, default) = match line {
            HeaderLine::Name => (&self.name_style, DEFAULT_NAME_STYLE),
            HeaderLine::Title => (&self.title_style, DEFAULT_TITLE_STYLE),
            HeaderLine::DepartmentOrPractice => (&self.department_style, DEFAULT_BODY_STYLE),
            HeaderLine::Location => (&self.location_style, DEFAULT_BODY_STYLE),
            HeaderLine::Contact | HeaderLine::Unknown => (&self.contact_style, DEFAULT_BODY_STYLE),
        };
        style.as_deref().unwrap_or(default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionPlan {
    pub key: String,
    pub label: Option<String>,
    pub heading_style: Option<String>,
    pub body_style: Option<String>,
    pub bullet_style: Option<String>,
    /// Maximum bullets rendered. Absent or 0 means no cap.
    pub bullet_limit: Option<usize>,
}

/// Informational only; the renderer does not enforce tone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TonePlan {
    pub person: Option<String>,
    pub bullets_max_words: Option<u32>,
    pub summary_max_words: Option<u32>,
}

/// Older plans carried one style set for every section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyStyles {
    pub heading_style: Option<String>,
    pub body_style: Option<String>,
    pub bullet_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPlan {
    #[serde(deserialize_with = "null_as_default")]
    pub header: HeaderPlan,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<SectionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<TonePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<LegacyStyles>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A section descriptor with every fallback applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSection {
    pub key: String,
    pub label: String,
    pub heading_style: String,
    pub body_style: String,
    /// Preference order; the first style the template knows is applied.
    pub bullet_styles: Vec<String>,
    pub bullet_limit: Option<usize>,
}

impl ResolvedSection {
    pub fn cap<'a>(&self, items: &'a [String]) -> &'a [String] {
        match self.bullet_limit {
            Some(limit) if limit > 0 => &items[..limit.min(items.len())],
            _ => items,
        }
    }
}

impl RenderPlan {
    /// Sections in plan order with fallbacks applied; sections without a label are dropped.
    pub fn resolved_sections(&self) -> Vec<ResolvedSection> {
        let legacy = self.styles.clone().unwrap_or_default();

        self.sections
            .iter()
            .filter_map(|section| {
                let label = section.label.as_deref().map(str::trim).filter(|l| !l.is_empty())?;

                let heading_style = section
                    .heading_style
                    .clone()
                    .or_else(|| legacy.heading_style.clone())
                    .unwrap_or_else(|| DEFAULT_HEADING_STYLE.to_string());
                let body_style = section
                    .body_style
                    .clone()
                    .or_else(|| legacy.body_style.clone())
                    .unwrap_or_else(|| DEFAULT_BODY_STYLE.to_string());
                let bullet_styles = match section
                    .bullet_style
                    .clone()
                    .or_else(|| legacy.bullet_style.clone())
                {
                    Some(style) => vec![style],
                    None => BULLET_STYLE_CANDIDATES.iter().map(|s| s.to_string()).collect(),
                };

                Some(ResolvedSection {
                    key: section.key.trim().to_string(),
                    label: label.to_string(),
                    heading_style,
                    body_style,
                    bullet_styles,
                    bullet_limit: section.bullet_limit,
                })
            })
            .collect()
    }
}

/// Loads a plan file, tolerating a BOM and surrounding noise.
pub fn load_plan(path: &Path) -> Result<RenderPlan, PlanError> {
    let value = read_json_file(path)?;
    Ok(serde_json::from_value(value)?)
}
