use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::ReadError;
use crate::llm_client::ladder::LadderError;
use crate::profile::extract::ExtractionError;
use crate::profile::model::ValidationError;
use crate::render::plan::PlanError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("No structured data found in model output")]
    NoStructuredData { last_raw: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ReadError> for AppError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::NotFound { .. } => AppError::BadRequest(e.to_string()),
            ReadError::UnreadableFormat { .. } => AppError::UnprocessableEntity(e.to_string()),
        }
    }
}

impl From<LadderError> for AppError {
    fn from(e: LadderError) -> Self {
        match e {
            LadderError::Service(e) => AppError::Llm(e.to_string()),
            LadderError::NoStructuredDataFound { last_raw, .. } => {
                AppError::NoStructuredData { last_raw }
            }
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::EmptySource => AppError::BadRequest(e.to_string()),
            ExtractionError::Ladder(e) => e.into(),
            ExtractionError::Validation(e) => e.into(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Ladder(e) => e.into(),
            PlanError::Read(e) => e.into(),
            PlanError::Invalid(_) | PlanError::MissingSections => {
                AppError::UnprocessableEntity(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None),
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                e.to_string(),
                Some(json!({"field": e.field(), "rule": e.rule()})),
            ),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
                None,
            ),
            AppError::NoStructuredData { last_raw } => {
                tracing::warn!("model output never parsed; last raw output: {last_raw}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "NO_STRUCTURED_DATA",
                    self.to_string(),
                    Some(json!({"last_raw": last_raw})),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
