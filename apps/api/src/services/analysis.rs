//! Document analysis — turns an uploaded résumé into a [`Profile`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::models::{Profile, UploadedDocument};
use crate::services::sample::sample_profile;
use crate::services::ServiceError;

/// Analyzes one document. Implementations must be safe to retry: the same
/// document yields an equivalent profile and nothing else changes.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, document: &UploadedDocument) -> Result<Profile, ServiceError>;
}

/// Stand-in for a real parsing backend: waits, then returns a fixed profile.
pub struct SimulatedAnalyzer {
    delay: Duration,
}

impl SimulatedAnalyzer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DocumentAnalyzer for SimulatedAnalyzer {
    async fn analyze(&self, document: &UploadedDocument) -> Result<Profile, ServiceError> {
        debug!(
            file = %document.file_name,
            bytes = document.content.len(),
            "Simulating document analysis"
        );
        tokio::time::sleep(self.delay).await;

        if document.content.is_empty() {
            return Err(ServiceError::Malformed(format!(
                "'{}' has no content",
                document.file_name
            )));
        }

        Ok(sample_profile())
    }
}
