use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::workflow::{Notification, Stage};

/// Every way a workflow or session operation can be refused.
/// All variants are recoverable; state is left consistent in each case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Document analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Item generation failed: {0}")]
    GenerationFailed(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Workflow is busy with an outstanding operation")]
    WorkflowBusy,

    #[error("Cannot {op} during the {stage} stage: {reason}")]
    InvalidTransition {
        op: &'static str,
        stage: Stage,
        reason: String,
    },
}

impl WorkflowError {
    pub(crate) fn invalid(op: &'static str, stage: Stage, reason: impl Into<String>) -> Self {
        WorkflowError::InvalidTransition {
            op,
            stage,
            reason: reason.into(),
        }
    }

    /// External-dependency failures can be retried with unchanged local state.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkflowError::AnalysisFailed(_)
                | WorkflowError::GenerationFailed(_)
                | WorkflowError::TranscriptionFailed(_)
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            WorkflowError::AnalysisFailed(_) => "ANALYSIS_FAILED",
            WorkflowError::GenerationFailed(_) => "GENERATION_FAILED",
            WorkflowError::TranscriptionFailed(_) => "TRANSCRIPTION_FAILED",
            WorkflowError::WorkflowBusy => "WORKFLOW_BUSY",
            WorkflowError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("malformed multipart body: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, retryable) = match &self {
            AppError::Workflow(err) => {
                let status = match err {
                    WorkflowError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    WorkflowError::AnalysisFailed(_)
                    | WorkflowError::GenerationFailed(_)
                    | WorkflowError::TranscriptionFailed(_) => {
                        tracing::warn!("External service failure: {err}");
                        StatusCode::BAD_GATEWAY
                    }
                    WorkflowError::WorkflowBusy | WorkflowError::InvalidTransition { .. } => {
                        StatusCode::CONFLICT
                    }
                };
                (status, err.code(), err.to_string(), err.is_retryable())
            }
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                false,
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    false,
                )
            }
        };

        let notification = match &self {
            AppError::Workflow(err) => Some(Notification::from(err)),
            _ => None,
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": retryable
            },
            "notification": notification
        }));

        (status, body).into_response()
    }
}
