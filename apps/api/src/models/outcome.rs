use serde::{Deserialize, Serialize};

/// Response text recorded for an item the user never answered.
pub const NO_RESPONSE: &str = "No answer provided";

/// Captured response plus derived feedback and score for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub item_id: String,
    pub prompt: String,
    /// Captured text, or [`NO_RESPONSE`] when `answered` is false.
    pub response: String,
    pub answered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}
