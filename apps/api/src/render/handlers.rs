use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::documents::Paragraph;
use crate::errors::AppError;
use crate::profile::handlers::bio_from_value;
use crate::render::document::{DocumentWriter, StyledDocument, StyledParagraph};
use crate::render::plan::RenderPlan;
use crate::render::planner::plan_from_exemplar;
use crate::render::{render_bio, RenderSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub bio: Value,
    /// Falls back to the plan loaded at startup.
    #[serde(default)]
    pub plan: Option<RenderPlan>,
    /// Styles the target template defines; a blank Word template when omitted.
    #[serde(default)]
    pub template_styles: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub paragraphs: Vec<StyledParagraph>,
    pub summary: RenderSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub plan: RenderPlan,
}

/// POST /api/v1/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    let bio = bio_from_value(req.bio)?;
    let plan = match (req.plan, &state.default_plan) {
        (Some(plan), _) => Arc::new(plan),
        (None, Some(default)) => Arc::clone(default),
        (None, None) => {
            return Err(AppError::BadRequest(
                "request has no plan and no default render plan is configured".to_string(),
            ))
        }
    };
    let mut document = match req.template_styles {
        Some(styles) => StyledDocument::with_styles(styles),
        None => StyledDocument::default(),
    };

    let summary = render_bio(&bio, &plan, &mut document);
    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        full_name = %bio.full_name,
        paragraphs = summary.paragraphs,
        unstyled = summary.unstyled,
        "bio rendered"
    );

    let saved_to = match &state.config.render_output_dir {
        Some(dir) => {
            let path = save_document(document.clone(), dir.join(format!("{request_id}.json"))).await?;
            info!(request_id = %request_id, path = %path.display(), "rendered document saved");
            Some(path)
        }
        None => None,
    };

    Ok(Json(RenderResponse {
        request_id,
        generated_at: Utc::now(),
        paragraphs: document.into_paragraphs(),
        summary,
        saved_to,
    }))
}

async fn save_document(document: StyledDocument, path: PathBuf) -> Result<PathBuf, AppError> {
    tokio::task::spawn_blocking(move || document.save(&path).map(|()| path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed saving document: {e}")))?
        .map_err(|e| AppError::Internal(e.into()))
}

/// POST /api/v1/render-plans
pub async fn handle_create_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    if req.paragraphs.iter().all(|p| p.text.trim().is_empty()) {
        return Err(AppError::BadRequest(
            "exemplar must contain at least one non-empty paragraph".to_string(),
        ));
    }

    let settings = state.planner_settings();
    let plan = plan_from_exemplar(state.llm.as_ref(), &settings, &req.paragraphs).await?;
    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        sections = plan.sections.len(),
        "render plan generated"
    );

    Ok(Json(PlanResponse {
        request_id,
        generated_at: Utc::now(),
        plan,
    }))
}
