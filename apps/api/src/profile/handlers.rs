use std::io::Write;
use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::documents::{read_document_lines, text_lines};
use crate::errors::AppError;
use crate::profile::extract::extract_with_model;
use crate::profile::heuristic::parse_bio_from_lines;
use crate::profile::model::{Bio, BioDraft, ManifestRow};
use crate::profile::reconcile::reconcile;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BioSource {
    Heuristic,
    Upload,
    Model,
    Reconciled,
    Validated,
}

#[derive(Debug, Serialize)]
pub struct BioEnvelope {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub source: BioSource,
    pub bio: Bio,
    pub empty_fields: Vec<&'static str>,
    pub manifest: ManifestRow,
}

impl BioEnvelope {
    pub fn new(source: BioSource, bio: Bio) -> Self {
        let envelope = Self {
            request_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source,
            empty_fields: bio.empty_fields(),
            manifest: bio.manifest_row(),
            bio,
        };
        info!(
            request_id = %envelope.request_id,
            source = ?envelope.source,
            full_name = %envelope.bio.full_name,
            empty_fields = ?envelope.empty_fields,
            "bio produced"
        );
        envelope
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub lines: Option<Vec<String>>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    pub payload: Value,
    #[serde(default)]
    pub source_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub bio: Value,
}

fn non_empty_lines(lines: Vec<String>) -> Result<Vec<String>, AppError> {
    let lines: Vec<String> = lines
        .iter()
        .flat_map(|l| text_lines(l))
        .collect();
    if lines.is_empty() {
        return Err(AppError::BadRequest("no document text provided".to_string()));
    }
    Ok(lines)
}

/// POST /api/v1/bios/extract
pub async fn handle_extract(Json(req): Json<ExtractRequest>) -> Result<Json<BioEnvelope>, AppError> {
    let lines = match (req.lines, req.text) {
        (Some(lines), _) => lines,
        (None, Some(text)) => vec![text],
        (None, None) => Vec::new(),
    };
    let lines = non_empty_lines(lines)?;
    let bio = parse_bio_from_lines(&lines)?;
    Ok(Json(BioEnvelope::new(BioSource::Heuristic, bio)))
}

/// Writes the upload to a temp file carrying its extension, then reads it back.
fn spool_and_read(extension: &str, data: &[u8]) -> Result<Vec<String>, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("vitae-upload-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .map_err(|e| AppError::Internal(e.into()))?;
    file.write_all(data)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(read_document_lines(file.path())?)
}

/// POST /api/v1/bios/extract/upload
pub async fn handle_extract_upload(
    mut multipart: Multipart,
) -> Result<Json<BioEnvelope>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        let data: bytes::Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;

        info!(file_name = %file_name, size = data.len(), "document uploaded");

        let lines = tokio::task::spawn_blocking(move || spool_and_read(&extension, &data))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed reading upload: {e}"))
            })??;

        let lines = non_empty_lines(lines)?;
        let bio = parse_bio_from_lines(&lines)?;
        return Ok(Json(BioEnvelope::new(BioSource::Upload, bio)));
    }

    Err(AppError::BadRequest(format!(
        "multipart field '{UPLOAD_FIELD}' is required"
    )))
}

/// POST /api/v1/bios/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<BioEnvelope>, AppError> {
    let settings = state.extraction_settings();
    let bio = extract_with_model(state.llm.as_ref(), &settings, &req.text).await?;
    Ok(Json(BioEnvelope::new(BioSource::Model, bio)))
}

/// POST /api/v1/bios/reconcile
pub async fn handle_reconcile(
    Json(req): Json<ReconcileRequest>,
) -> Result<Json<BioEnvelope>, AppError> {
    let bio = reconcile(&req.payload, &req.source_text)?;
    Ok(Json(BioEnvelope::new(BioSource::Reconciled, bio)))
}

/// POST /api/v1/bios/validate
pub async fn handle_validate(Json(req): Json<ValidateRequest>) -> Result<Json<BioEnvelope>, AppError> {
    let bio = bio_from_value(req.bio)?;
    Ok(Json(BioEnvelope::new(BioSource::Validated, bio)))
}

/// Runs an arbitrary JSON value through the validating constructor.
pub fn bio_from_value(value: Value) -> Result<Bio, AppError> {
    let draft: BioDraft = serde_json::from_value(value)
        .map_err(|e| AppError::UnprocessableEntity(format!("bio must be a JSON object: {e}")))?;
    Ok(Bio::from_draft(draft)?)
}
