use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ladder::LadderSettings;
use crate::llm_client::prompts::load_prompt;
use crate::llm_client::TextCompletionService;
use crate::profile::extract::ExtractionSettings;
use crate::profile::prompts::{EXTRACT_PROMPT, EXTRACT_PROMPT_FILE};
use crate::render::plan::RenderPlan;
use crate::render::planner::PlannerSettings;
use crate::render::prompts::{PLAN_PROMPT, PLAN_PROMPT_FILE};

/// Prompt templates resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub extract: String,
    pub render_plan: String,
}

impl PromptSet {
    pub fn load(dir: Option<&Path>) -> Self {
        Self {
            extract: load_prompt(dir, EXTRACT_PROMPT_FILE, EXTRACT_PROMPT),
            render_plan: load_prompt(dir, PLAN_PROMPT_FILE, PLAN_PROMPT),
        }
    }
}

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextCompletionService>,
    pub config: Config,
    pub prompts: Arc<PromptSet>,
    /// Loaded from `RENDER_PLAN_PATH` at startup.
    pub default_plan: Option<Arc<RenderPlan>>,
}

impl AppState {
    fn ladder_settings(&self) -> LadderSettings {
        LadderSettings {
            model: self.config.extraction_model.clone(),
            temperature: self.config.extraction_temperature,
        }
    }

    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            prompt_template: self.prompts.extract.clone(),
            ladder: self.ladder_settings(),
            source_char_limit: self.config.source_char_limit,
        }
    }

    pub fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            prompt_template: self.prompts.render_plan.clone(),
            ladder: self.ladder_settings(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_set_defaults_and_override() {
        assert_eq!(PromptSet::load(None).extract, EXTRACT_PROMPT);

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PLAN_PROMPT_FILE), "plan <<<PARA_JSON>>>").unwrap();
        let prompts = PromptSet::load(Some(dir.path()));
        assert_eq!(prompts.extract, EXTRACT_PROMPT);
        assert_eq!(prompts.render_plan, "plan <<<PARA_JSON>>>");
    }
}
