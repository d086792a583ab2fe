//! Item generation — builds the ordered question bank for a [`Profile`].
//!
//! Default: `ProfileItemGenerator` (deterministic, derived from the profile's
//! own experience, skills, strengths and gaps).
//! Optional: `LlmItemGenerator` (asks Claude for a tailored set).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::{Category, Difficulty, Item, Profile};
use crate::services::prompts::{ITEM_GENERATION_PROMPT_TEMPLATE, ITEM_GENERATION_SYSTEM};
use crate::services::ServiceError;

/// Upper bound on the size of a generated set.
pub const MAX_ITEMS: usize = 10;

/// Generates the question bank. The returned order is the traversal order.
#[async_trait]
pub trait ItemGenerator: Send + Sync {
    async fn generate_items(&self, profile: &Profile) -> Result<Vec<Item>, ServiceError>;
}

// ────────────────────────────────────────────────────────────────────────────
// ProfileItemGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Waits for the configured delay, then derives questions from the profile.
pub struct ProfileItemGenerator {
    delay: Duration,
}

impl ProfileItemGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ItemGenerator for ProfileItemGenerator {
    async fn generate_items(&self, profile: &Profile) -> Result<Vec<Item>, ServiceError> {
        tokio::time::sleep(self.delay).await;
        let items = build_question_bank(profile, MAX_ITEMS);
        debug!(count = items.len(), "Built question bank for {}", profile.name);
        Ok(items)
    }
}

struct Draft {
    text: String,
    category: Category,
    difficulty: Difficulty,
    notes: Option<String>,
    ideal_answer: Option<String>,
}

/// Derives an ordered question bank from a profile.
///
/// Order: experience, technical, weakness, behavioral, strength. Each source
/// contributes at most two questions; ids are assigned "1".."n" after
/// truncation to `max_items`.
fn build_question_bank(profile: &Profile, max_items: usize) -> Vec<Item> {
    let mut drafts = Vec::new();

    for entry in profile.experience.iter().take(2) {
        drafts.push(Draft {
            text: format!(
                "Walk me through your time as {} at {}. What was the hardest problem you owned?",
                entry.title, entry.company
            ),
            category: Category::Experience,
            difficulty: Difficulty::Medium,
            notes: entry
                .description
                .first()
                .map(|claim| format!("Probe the claim: \"{claim}\"")),
            ideal_answer: Some(
                "Situation and constraints, the candidate's specific role, the approach \
                 taken, and a measurable result."
                    .to_string(),
            ),
        });
    }

    for (rank, skill) in profile.skills.iter().take(2).enumerate() {
        drafts.push(Draft {
            text: format!(
                "How have you applied {skill} in production, and what trade-offs did you run into?"
            ),
            category: Category::Technical,
            difficulty: if rank == 0 {
                Difficulty::Hard
            } else {
                Difficulty::Medium
            },
            notes: Some(format!("Assess depth beyond surface familiarity with {skill}.")),
            ideal_answer: Some(
                "A concrete system, why the tool fit, what went wrong, and what they would change."
                    .to_string(),
            ),
        });
    }

    for weakness in profile.weaknesses.iter().take(2) {
        drafts.push(Draft {
            text: format!("Your background shows \"{weakness}\". How are you addressing that?"),
            category: Category::Weakness,
            difficulty: Difficulty::Easy,
            notes: Some("Look for self-awareness and a realistic plan.".to_string()),
            ideal_answer: None,
        });
    }

    if let Some(missing) = profile.missing_skills.as_deref().filter(|m| !m.is_empty()) {
        let named: Vec<&str> = missing.iter().take(2).map(String::as_str).collect();
        drafts.push(Draft {
            text: format!(
                "If this role needed {} from day one, how would you get productive quickly?",
                named.join(" and ")
            ),
            category: Category::Weakness,
            difficulty: Difficulty::Medium,
            notes: None,
            ideal_answer: Some(
                "A structured learning plan tied to past examples of ramping up on new tools."
                    .to_string(),
            ),
        });
    }

    drafts.push(Draft {
        text: "Describe a time you had to deliver under a tight deadline. How did you decide what to cut?"
            .to_string(),
        category: Category::Behavioral,
        difficulty: Difficulty::Medium,
        notes: None,
        ideal_answer: Some(
            "Prioritisation, communication with stakeholders, and what shipped.".to_string(),
        ),
    });

    for strength in profile.strengths.iter().take(2) {
        drafts.push(Draft {
            text: format!("Give a concrete example that demonstrates this: {strength}."),
            category: Category::Strength,
            difficulty: Difficulty::Easy,
            notes: None,
            ideal_answer: None,
        });
    }

    drafts.push(Draft {
        text: "How do you decide which new tools or practices are worth adopting on your team?"
            .to_string(),
        category: Category::Behavioral,
        difficulty: Difficulty::Easy,
        notes: None,
        ideal_answer: None,
    });

    drafts
        .into_iter()
        .take(max_items)
        .enumerate()
        .map(|(i, draft)| Item {
            id: (i + 1).to_string(),
            text: draft.text,
            category: draft.category,
            difficulty: draft.difficulty,
            notes: draft.notes,
            ideal_answer: draft.ideal_answer,
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// LlmItemGenerator
// ────────────────────────────────────────────────────────────────────────────

/// Shape the model is asked to return; `id` is tolerated missing.
#[derive(Debug, Deserialize)]
struct GeneratedItem {
    #[serde(default)]
    id: Option<String>,
    text: String,
    category: Category,
    difficulty: Difficulty,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    ideal_answer: Option<String>,
}

pub struct LlmItemGenerator {
    llm: LlmClient,
}

impl LlmItemGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ItemGenerator for LlmItemGenerator {
    async fn generate_items(&self, profile: &Profile) -> Result<Vec<Item>, ServiceError> {
        let profile_json = serde_json::to_string_pretty(profile)
            .map_err(|e| ServiceError::Malformed(format!("profile did not serialize: {e}")))?;
        let prompt = ITEM_GENERATION_PROMPT_TEMPLATE
            .replace("{max_items}", &MAX_ITEMS.to_string())
            .replace("{profile_json}", &profile_json);
        let system = format!("{ITEM_GENERATION_SYSTEM} {JSON_ONLY_INSTRUCTION}");

        let generated: Vec<GeneratedItem> = self.llm.complete_json(&prompt, &system).await?;
        info!("LLM generated {} items", generated.len());

        Ok(generated
            .into_iter()
            .take(MAX_ITEMS)
            .map(|g| Item {
                id: g.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                text: g.text,
                category: g.category,
                difficulty: g.difficulty,
                notes: g.notes,
                ideal_answer: g.ideal_answer,
            })
            .collect())
    }
}
