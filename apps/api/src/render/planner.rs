//! Style planner: asks the completion service for a render plan that
//! mirrors an exemplar document's paragraph styles.

use serde_json::Value;
use tracing::info;

use crate::documents::Paragraph;
use crate::llm_client::ladder::{complete_json, LadderSettings};
use crate::llm_client::TextCompletionService;
use crate::render::plan::{PlanError, RenderPlan};
use crate::render::prompts::PARAGRAPHS_PLACEHOLDER;

/// Only the head of a long exemplar is sent.
pub const MAX_EXEMPLAR_PARAGRAPHS: usize = 400;

#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub prompt_template: String,
    pub ladder: LadderSettings,
}

pub fn build_prompt(template: &str, paragraphs: &[Paragraph]) -> Result<String, PlanError> {
    let facts: Vec<&Paragraph> = paragraphs
        .iter()
        .filter(|p| !p.text.trim().is_empty())
        .take(MAX_EXEMPLAR_PARAGRAPHS)
        .collect();
    let para_json = serde_json::to_string(&facts)?;
    Ok(template.replace(PARAGRAPHS_PLACEHOLDER, &para_json))
}

/// Checks the minimal shape before typed decoding: an object with `sections`.
pub fn plan_from_value(value: Value) -> Result<RenderPlan, PlanError> {
    let has_sections = value
        .as_object()
        .is_some_and(|map| map.contains_key("sections"));
    if !has_sections {
        return Err(PlanError::MissingSections);
    }
    Ok(serde_json::from_value(value)?)
}

pub async fn plan_from_exemplar(
    service: &dyn TextCompletionService,
    settings: &PlannerSettings,
    paragraphs: &[Paragraph],
) -> Result<RenderPlan, PlanError> {
    let prompt = build_prompt(&settings.prompt_template, paragraphs)?;
    info!(
        backend = service.backend_name(),
        paragraphs = paragraphs.len().min(MAX_EXEMPLAR_PARAGRAPHS),
        "planning render styles from exemplar"
    );
    let value = complete_json(service, &prompt, &settings.ladder).await?;
    plan_from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ladder::testing::ScriptedService;
    use crate::render::prompts::PLAN_PROMPT;

    fn settings() -> PlannerSettings {
        PlannerSettings {
            prompt_template: PLAN_PROMPT.to_string(),
            ladder: LadderSettings {
                model: "test-model".to_string(),
                temperature: 0.1,
            },
        }
    }

    fn exemplar() -> Vec<Paragraph> {
        vec![
            Paragraph {
                style_name: "Heading 1".into(),
                text: "Jane Doe".into(),
            },
            Paragraph {
                style_name: "Normal".into(),
                text: "   ".into(),
            },
            Paragraph {
                style_name: "List Bullet".into(),
                text: "Pricing".into(),
            },
        ]
    }

    #[test]
    fn test_prompt_embeds_non_blank_paragraphs() {
        let prompt = build_prompt("P: <<<PARA_JSON>>>", &exemplar()).unwrap();
        assert_eq!(
            prompt,
            r#"P: [{"style_name":"Heading 1","text":"Jane Doe"},{"style_name":"List Bullet","text":"Pricing"}]"#
        );
    }

    #[test]
    fn test_prompt_caps_paragraph_count() {
        let many: Vec<Paragraph> = (0..500).map(|i| Paragraph::plain(format!("p{i}"))).collect();
        let prompt = build_prompt("<<<PARA_JSON>>>", &many).unwrap();
        let facts: Vec<Paragraph> = serde_json::from_str(&prompt).unwrap();
        assert_eq!(facts.len(), MAX_EXEMPLAR_PARAGRAPHS);
    }

    #[tokio::test]
    async fn test_plan_from_model_output() {
        let service = ScriptedService::replies(&[r#"{
            "header": {"name_style": "Heading 1"},
            "sections": [{"key": "expertise", "label": "Expertise", "bullet_limit": 6}],
            "tone": {"person": "third"}
        }"#]);
        let plan = plan_from_exemplar(&service, &settings(), &exemplar())
            .await
            .unwrap();
        assert_eq!(plan.sections[0].bullet_limit, Some(6));
        assert!(service.requests()[0].prompt.contains("\"List Bullet\""));
    }

    #[tokio::test]
    async fn test_output_without_sections_rejected() {
        let service = ScriptedService::replies(&[r#"{"header": {}}"#]);
        let err = plan_from_exemplar(&service, &settings(), &exemplar())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::MissingSections));
    }

    #[test]
    fn test_plan_from_value_rejects_non_objects() {
        assert!(matches!(
            plan_from_value(serde_json::json!([1, 2])),
            Err(PlanError::MissingSections)
        ));
    }
}
