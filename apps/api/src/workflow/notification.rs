use serde::Serialize;

use crate::errors::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
}

/// Displayable message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: String,
    pub retryable: bool,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            message: message.into(),
            retryable: false,
        }
    }

    pub fn document_analyzed() -> Self {
        Self::success(
            "Resume Analyzed",
            "Key information has been extracted from your resume.",
        )
    }

    pub fn items_generated(count: usize) -> Self {
        Self::success(
            "Questions Generated",
            format!("{count} interview questions were created from your resume."),
        )
    }

    pub fn session_completed(count: usize) -> Self {
        Self::success(
            "Interview Completed",
            format!("All {count} questions have been reviewed."),
        )
    }
}

impl From<&WorkflowError> for Notification {
    fn from(err: &WorkflowError) -> Self {
        let title = match err {
            WorkflowError::UnsupportedMediaType(_) => "Unsupported File",
            WorkflowError::AnalysisFailed(_) => "Analysis Failed",
            WorkflowError::GenerationFailed(_) => "Generation Failed",
            WorkflowError::TranscriptionFailed(_) => "Transcription Failed",
            WorkflowError::WorkflowBusy => "Please Wait",
            WorkflowError::InvalidTransition { .. } => "Action Not Available",
        };
        let message = match err {
            WorkflowError::UnsupportedMediaType(_) => {
                "Please upload a PDF or DOCX file.".to_string()
            }
            WorkflowError::AnalysisFailed(_) => {
                "We couldn't analyze your resume. Please try again.".to_string()
            }
            WorkflowError::GenerationFailed(_) => {
                "We couldn't generate interview questions. Please try again.".to_string()
            }
            other => other.to_string(),
        };
        Self {
            level: Level::Error,
            title: title.to_string(),
            message,
            retryable: err.is_retryable(),
        }
    }
}
