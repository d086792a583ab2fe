//! Transcription — the bounded "Processing" step between stopping a
//! recording and having a captured answer.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::models::Item;
use crate::services::ServiceError;

#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns the answer text recorded for `item`.
    async fn transcribe(&self, item: &Item) -> Result<String, ServiceError>;
}

/// Waits, then returns a templated answer that echoes the question.
pub struct SimulatedTranscriber {
    delay: Duration,
}

impl SimulatedTranscriber {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Transcriber for SimulatedTranscriber {
    async fn transcribe(&self, item: &Item) -> Result<String, ServiceError> {
        debug!(item_id = %item.id, category = %item.category, "Simulating transcription");
        tokio::time::sleep(self.delay).await;
        Ok(format!(
            "Simulated answer to \"{}\". A speech-to-text backend would return the recorded answer here.",
            item.text
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Difficulty};

    #[tokio::test(start_paused = true)]
    async fn test_transcript_echoes_prompt() {
        let item = Item {
            id: "7".to_string(),
            text: "What is ownership?".to_string(),
            category: Category::Technical,
            difficulty: Difficulty::Easy,
            notes: None,
            ideal_answer: None,
        };
        let transcriber = SimulatedTranscriber::new(Duration::from_millis(1500));

        let started = tokio::time::Instant::now();
        let text = transcriber.transcribe(&item).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert!(text.contains("What is ownership?"));
    }
}
