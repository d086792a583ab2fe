//! External collaborators of the workflow: document analysis, item
//! generation and answer transcription.
//!
//! Each is a trait so the controller can hold `Arc<dyn …>` and backends can be
//! swapped at startup. The simulated backends stand in for real services
//! with a configurable delay.

pub mod analysis;
pub mod generation;
pub mod prompts;
mod sample;
pub mod transcription;

use thiserror::Error;

use crate::llm_client::LlmError;

pub use analysis::{DocumentAnalyzer, SimulatedAnalyzer};
pub use generation::{ItemGenerator, LlmItemGenerator, ProfileItemGenerator};
pub use transcription::{SimulatedTranscriber, Transcriber};

/// Failure reported by any external collaborator.
/// The controller folds these into the matching `WorkflowError` kind.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed input: {0}")]
    Malformed(String),
}
