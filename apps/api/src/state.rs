use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, ItemBackend};
use crate::llm_client::{self, LlmClient};
use crate::services::{
    ItemGenerator, LlmItemGenerator, ProfileItemGenerator, SimulatedAnalyzer, SimulatedTranscriber,
};
use crate::session::{Grader, PlaceholderGrader};
use crate::workflow::{Services, WorkflowController};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The single workflow this process serves.
    pub workflow: Arc<WorkflowController>,
}

impl AppState {
    pub fn new(config: Config, workflow: Arc<WorkflowController>) -> Self {
        Self { config, workflow }
    }

    /// Wires the configured service backends into a fresh controller.
    pub fn from_config(config: Config) -> Result<Self> {
        let generator: Arc<dyn ItemGenerator> = match config.item_backend {
            ItemBackend::Profile => Arc::new(ProfileItemGenerator::new(config.generation_delay)),
            ItemBackend::Llm => {
                let api_key = config
                    .anthropic_api_key
                    .clone()
                    .context("ANTHROPIC_API_KEY is required for the LLM item generator")?;
                let llm = LlmClient::new(api_key).context("Failed to build HTTP client")?;
                info!("LLM item generator enabled (model: {})", llm_client::MODEL);
                Arc::new(LlmItemGenerator::new(llm))
            }
        };

        let grader: Arc<dyn Grader> = match config.grader_seed {
            Some(seed) => {
                info!("Placeholder grader seeded with {seed}");
                Arc::new(PlaceholderGrader::seeded(seed))
            }
            None => Arc::new(PlaceholderGrader::from_entropy()),
        };

        let services = Services {
            analyzer: Arc::new(SimulatedAnalyzer::new(config.analysis_delay)),
            generator,
            transcriber: Arc::new(SimulatedTranscriber::new(config.transcription_delay)),
            grader,
        };

        Ok(Self::new(config, Arc::new(WorkflowController::new(services))))
    }
}
