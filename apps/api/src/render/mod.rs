//! Renderer: applies a render plan to a validated Bio through a DocumentWriter.
//!
//! Emission is pure (see `sections`); only `render_bio` touches the writer.
//! Style application is best-effort: a style the template does not define is
//! logged and skipped, never fatal.

pub mod document;
pub mod handlers;
pub mod plan;
pub mod planner;
pub mod prompts;
pub mod sections;

use serde::Serialize;
use tracing::debug;

use crate::profile::model::Bio;
use crate::render::document::DocumentWriter;
use crate::render::plan::RenderPlan;
use crate::render::sections::Emission;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderSummary {
    pub paragraphs: usize,
    /// Paragraphs left unstyled because no candidate style exists in the template.
    pub unstyled: usize,
}

/// Every paragraph the plan produces for `bio`, in document order.
pub fn plan_emissions(bio: &Bio, plan: &RenderPlan) -> Vec<Emission> {
    let mut out = sections::header(bio, &plan.header);
    for section in plan.resolved_sections() {
        out.extend(sections::section(bio, &section));
    }
    out
}

pub fn render_bio(bio: &Bio, plan: &RenderPlan, writer: &mut dyn DocumentWriter) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for emission in plan_emissions(bio, plan) {
        let id = writer.add_paragraph(&emission.text);
        summary.paragraphs += 1;

        let applied = emission.styles.iter().any(|style| match writer.set_style(id, style) {
            Ok(()) => true,
            Err(e) => {
                debug!("skipping style: {e}");
                false
            }
        });
        if !applied {
            summary.unstyled += 1;
        }
    }

    summary
}
