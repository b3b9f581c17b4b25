//! Bio record model: the single definition of what a valid profile looks like.
//!
//! # Construction
//! `Bio::from_draft` is the only way to obtain a `Bio`. It runs in two phases:
//! 1. per-field normalization (`normalize.rs`, pure functions)
//! 2. whole-record rules: name length and bullet compression
//!
//! Deserializing a `Bio` goes through the same constructor, so JSON coming back
//! from disk or from a client is re-validated.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::profile::normalize::{
    collapse_whitespace, compress_bullet, normalize_email, normalize_linkedin_url, normalize_list,
    normalize_name, normalize_phone, optional_text, smart_title,
};

/// Name used when no person name can be found.
pub const PLACEHOLDER_NAME: &str = "Unknown";

const MIN_NAME_CHARS: usize = 2;

/// The five flat bullet-list fields, by JSON key.
pub const LIST_FIELDS: [&str; 5] = [
    "expertise_bullets",
    "education",
    "certifications",
    "affiliations",
    "awards",
];

/// Fields surfaced by `Bio::empty_fields` when unfilled.
const AUDITED_FIELDS: [&str; 4] = [
    "current_title",
    "summary_paragraph",
    "expertise_bullets",
    "education",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("full_name is required")]
    MissingName,

    #[error("full_name must be a string, got {kind}")]
    NameNotString { kind: &'static str },

    #[error("full_name must be at least 2 characters, got {value:?}")]
    NameTooShort { value: String },

    #[error("email is not a valid address: {value:?}")]
    InvalidEmail { value: String },

    #[error("linkedin_url must be a linkedin.com URL: {value:?}")]
    NotProfessionalNetwork { value: String },
}

impl ValidationError {
    /// The Bio field the failure belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingName
            | ValidationError::NameNotString { .. }
            | ValidationError::NameTooShort { .. } => "full_name",
            ValidationError::InvalidEmail { .. } => "email",
            ValidationError::NotProfessionalNetwork { .. } => "linkedin_url",
        }
    }

    /// Short machine-readable name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            ValidationError::MissingName => "required",
            ValidationError::NameNotString { .. } => "type_string",
            ValidationError::NameTooShort { .. } => "min_length",
            ValidationError::InvalidEmail { .. } => "email_format",
            ValidationError::NotProfessionalNetwork { .. } => "professional_network_host",
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One entry of selected experience.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceItem {
    pub client_or_project: String,
    pub role: Option<String>,
    pub impact: Option<String>,
}

impl ExperienceItem {
    /// Builds an item from loose values. Returns `None` when the label is blank.
    pub fn from_parts(label: &str, role: Option<&str>, impact: Option<&str>) -> Option<Self> {
        let client_or_project = label.trim();
        if client_or_project.is_empty() {
            return None;
        }
        let role = role.map(str::trim).filter(|r| !r.is_empty());
        let impact = impact
            .map(collapse_whitespace)
            .filter(|i| !i.is_empty());
        Some(Self {
            client_or_project: client_or_project.to_string(),
            role: role.map(String::from),
            impact,
        })
    }

    /// Reads an experience object; plain strings become label-only items.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let text = |key: &str| map.get(key).and_then(Value::as_str);
                Self::from_parts(
                    text("client_or_project").unwrap_or(""),
                    text("role"),
                    text("impact"),
                )
            }
            Value::String(label) => Self::from_parts(label, None, None),
            _ => None,
        }
    }
}

/// Loosely-typed Bio input. Every field is raw JSON; unknown keys are ignored
/// and missing keys default to `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BioDraft {
    pub full_name: Value,
    pub current_title: Value,
    pub department_or_practice: Value,
    pub location: Value,
    pub email: Value,
    pub phone: Value,
    pub linkedin_url: Value,
    pub summary_paragraph: Value,
    pub expertise_bullets: Value,
    pub selected_experience: Value,
    pub education: Value,
    pub certifications: Value,
    pub affiliations: Value,
    pub awards: Value,
}

impl BioDraft {
    /// Mutable access to one of the five flat list fields by key.
    pub fn list_field_mut(&mut self, key: &str) -> Option<&mut Value> {
        match key {
            "expertise_bullets" => Some(&mut self.expertise_bullets),
            "education" => Some(&mut self.education),
            "certifications" => Some(&mut self.certifications),
            "affiliations" => Some(&mut self.affiliations),
            "awards" => Some(&mut self.awards),
            _ => None,
        }
    }
}

/// The canonical, validated professional profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BioDraft")]
pub struct Bio {
    pub full_name: String,
    pub current_title: Option<String>,
    pub department_or_practice: Option<String>,
    pub location: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,

    pub summary_paragraph: Option<String>,
    pub expertise_bullets: Vec<String>,
    pub selected_experience: Vec<ExperienceItem>,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub affiliations: Vec<String>,
    pub awards: Vec<String>,
}

impl TryFrom<BioDraft> for Bio {
    type Error = ValidationError;

    fn try_from(draft: BioDraft) -> Result<Self, Self::Error> {
        Bio::from_draft(draft)
    }
}

impl Bio {
    /// Validating constructor.
    pub fn from_draft(draft: BioDraft) -> Result<Self, ValidationError> {
        // Phase 1: field-level normalization.
        let full_name = match &draft.full_name {
            Value::String(s) => normalize_name(s),
            Value::Null => return Err(ValidationError::MissingName),
            other => {
                return Err(ValidationError::NameNotString {
                    kind: json_kind(other),
                })
            }
        };

        let bio = Bio {
            full_name,
            current_title: optional_text(&draft.current_title).map(|t| smart_title(&t)),
            department_or_practice: optional_text(&draft.department_or_practice),
            location: optional_text(&draft.location),
            email: normalize_email(&draft.email)?,
            phone: normalize_phone(&draft.phone),
            linkedin_url: normalize_linkedin_url(&draft.linkedin_url)?,
            summary_paragraph: optional_text(&draft.summary_paragraph),
            expertise_bullets: normalize_list(&draft.expertise_bullets),
            selected_experience: normalize_experience(&draft.selected_experience),
            education: normalize_list(&draft.education),
            certifications: normalize_list(&draft.certifications),
            affiliations: normalize_list(&draft.affiliations),
            awards: normalize_list(&draft.awards),
        };

        // Phase 2: whole-record rules.
        bio.enforce_record_rules()
    }

    fn enforce_record_rules(mut self) -> Result<Self, ValidationError> {
        if self.full_name.chars().count() < MIN_NAME_CHARS {
            return Err(ValidationError::NameTooShort {
                value: self.full_name,
            });
        }

        for list in [
            &mut self.expertise_bullets,
            &mut self.education,
            &mut self.certifications,
            &mut self.affiliations,
            &mut self.awards,
        ] {
            for bullet in list.iter_mut() {
                *bullet = compress_bullet(bullet);
            }
        }
        Ok(self)
    }

    /// Looks up one of the flat string-list fields by its JSON key.
    pub fn list_field(&self, key: &str) -> Option<&[String]> {
        match key {
            "expertise_bullets" => Some(&self.expertise_bullets),
            "education" => Some(&self.education),
            "certifications" => Some(&self.certifications),
            "affiliations" => Some(&self.affiliations),
            "awards" => Some(&self.awards),
            _ => None,
        }
    }

    /// Which of the headline fields are still empty.
    pub fn empty_fields(&self) -> Vec<&'static str> {
        AUDITED_FIELDS
            .into_iter()
            .filter(|field| match *field {
                "current_title" => self.current_title.is_none(),
                "summary_paragraph" => self.summary_paragraph.is_none(),
                "expertise_bullets" => self.expertise_bullets.is_empty(),
                "education" => self.education.is_empty(),
                _ => false,
            })
            .collect()
    }

    /// Flattened key facts for a CSV or log manifest.
    pub fn manifest_row(&self) -> ManifestRow {
        ManifestRow {
            full_name: self.full_name.clone(),
            title: self.current_title.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            phone: self.phone.clone().unwrap_or_default(),
            linkedin: self.linkedin_url.clone().unwrap_or_default(),
            expertise_count: self.expertise_bullets.len(),
            experience_count: self.selected_experience.len(),
        }
    }
}

fn normalize_experience(value: &Value) -> Vec<ExperienceItem> {
    match value {
        Value::Array(items) => items.iter().filter_map(ExperienceItem::from_value).collect(),
        Value::Object(_) => ExperienceItem::from_value(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestRow {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub expertise_count: usize,
    pub experience_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: Value) -> BioDraft {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_record_normalizes() {
        let bio = Bio::from_draft(draft(json!({
            "full_name": "jane DOE",
            "current_title": "senior managing director, ai/ml",
            "department_or_practice": "  Data &   Analytics ",
            "location": "Boston, MA",
            "email": "jane.doe@example.com",
            "phone": "+1 (617) 555-0100",
            "linkedin_url": "https://www.linkedin.com/in/janedoe",
            "summary_paragraph": "Leads AI and analytics programs.",
            "expertise_bullets": ["Responsible AI & model risk", "responsible ai & model risk"],
            "selected_experience": [{
                "client_or_project": " Top-10 US Bank ",
                "role": "Program Lead",
                "impact": "Designed   AI governance for >50 models."
            }],
            "education": ["BS, Computer Science — Northeastern University"],
            "certifications": "CFA Level I",
        })))
        .unwrap();

        assert_eq!(bio.full_name, "Jane DOE");
        assert_eq!(
            bio.current_title.as_deref(),
            Some("Senior Managing Director, AI/ML")
        );
        assert_eq!(bio.department_or_practice.as_deref(), Some("Data & Analytics"));
        assert_eq!(bio.phone.as_deref(), Some("(617) 555-0100"));
        assert_eq!(bio.expertise_bullets, vec!["Responsible AI & model risk"]);
        assert_eq!(bio.certifications, vec!["CFA Level I"]);
        assert_eq!(bio.selected_experience[0].client_or_project, "Top-10 US Bank");
        assert_eq!(
            bio.selected_experience[0].impact.as_deref(),
            Some("Designed AI governance for >50 models.")
        );
        assert!(bio.affiliations.is_empty());
    }

    #[test]
    fn test_name_too_short_fails() {
        let err = Bio::from_draft(draft(json!({"full_name": " J "}))).unwrap_err();
        assert!(matches!(err, ValidationError::NameTooShort { .. }));
        assert_eq!(err.field(), "full_name");
        assert_eq!(err.rule(), "min_length");
    }

    #[test]
    fn test_name_not_string_fails() {
        let err = Bio::from_draft(draft(json!({"full_name": 42}))).unwrap_err();
        assert_eq!(err, ValidationError::NameNotString { kind: "number" });
    }

    #[test]
    fn test_missing_name_fails() {
        let err = Bio::from_draft(BioDraft::default()).unwrap_err();
        assert_eq!(err, ValidationError::MissingName);
    }

    #[test]
    fn test_bad_email_fails() {
        let err = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "email": "not-an-email"
        })))
        .unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn test_non_linkedin_link_fails() {
        let err = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "linkedin_url": "http://example.com/in/jdoe"
        })))
        .unwrap_err();
        assert_eq!(err.field(), "linkedin_url");
    }

    #[test]
    fn test_other_fields_degrade_gracefully() {
        let bio = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "current_title": 7,
            "location": "   ",
            "phone": "call me",
            "awards": {"not": "a list"},
            "selected_experience": [{"role": "Lead"}, 5, "Acme Rollout"],
        })))
        .unwrap();
        assert_eq!(bio.current_title, None);
        assert_eq!(bio.location, None);
        assert_eq!(bio.phone, None);
        assert!(bio.awards.is_empty());
        assert_eq!(bio.selected_experience.len(), 1);
        assert_eq!(bio.selected_experience[0].client_or_project, "Acme Rollout");
    }

    #[test]
    fn test_long_bullets_compressed_after_normalization() {
        let long = "Built pricing models for retail and consumer goods clients; \
                    extended them into demand forecasting and promotion planning at scale";
        let bio = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "expertise_bullets": [long, "Short bullet"],
        })))
        .unwrap();
        assert_eq!(
            bio.expertise_bullets,
            vec![
                "Built pricing models for retail and consumer goods clients",
                "Short bullet"
            ]
        );
    }

    #[test]
    fn test_unknown_keys_ignored_when_deserializing() {
        let bio: Bio = serde_json::from_value(json!({
            "full_name": "Jane Doe",
            "favourite_colour": "green"
        }))
        .unwrap();
        assert_eq!(bio.full_name, "Jane Doe");
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let result: Result<Bio, _> = serde_json::from_value(json!({
            "full_name": "Jane Doe",
            "linkedin_url": "http://example.com/in/jdoe"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_keys_match_field_names() {
        let bio = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "selected_experience": [{"client_or_project": "Acme", "role": "Lead"}],
        })))
        .unwrap();
        let value = serde_json::to_value(&bio).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 14);
        assert_eq!(
            value["selected_experience"][0],
            json!({"client_or_project": "Acme", "role": "Lead", "impact": null})
        );
    }

    #[test]
    fn test_round_trip_through_json_is_stable() {
        let bio = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "phone": "617-555-0100",
            "linkedin_url": "linkedin.com/in/jdoe",
        })))
        .unwrap();
        let back: Bio = serde_json::from_value(serde_json::to_value(&bio).unwrap()).unwrap();
        assert_eq!(back, bio);
    }

    #[test]
    fn test_empty_fields_and_manifest() {
        let bio = Bio::from_draft(draft(json!({
            "full_name": "Jane Doe",
            "current_title": "Director",
            "expertise_bullets": ["AI"],
        })))
        .unwrap();
        assert_eq!(bio.empty_fields(), vec!["summary_paragraph", "education"]);
        let row = bio.manifest_row();
        assert_eq!(row.title, "Director");
        assert_eq!(row.expertise_count, 1);
        assert_eq!(row.email, "");
    }
}
