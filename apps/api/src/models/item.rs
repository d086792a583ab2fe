use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Behavioral,
    Experience,
    Strength,
    Weakness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A single interview question generated from a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique within one generated set.
    pub id: String,
    pub text: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// What an interviewer should listen for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Outline of a strong answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_answer: Option<String>,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Experience => "experience",
            Category::Strength => "strength",
            Category::Weakness => "weakness",
        };
        f.write_str(label)
    }
}
