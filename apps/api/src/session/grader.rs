//! Grading — pluggable strategy that turns an item and its response into
//! feedback and a score.
//!
//! Default: `PlaceholderGrader` (random template, uniform score in 6..=10).
//! A real grading backend implements [`Grader`] and is injected into the
//! controller; the runner's control flow does not change.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::Item;

pub const MIN_PLACEHOLDER_SCORE: u8 = 6;
pub const MAX_PLACEHOLDER_SCORE: u8 = 10;

pub const FEEDBACK_TEMPLATES: &[&str] = &[
    "Well structured. You walked through the situation and the result clearly.",
    "Solid answer. A specific metric or example would make it more convincing.",
    "Good coverage of the topic. Try to trim the setup and get to your decision sooner.",
    "Clear and direct. You hit the points an interviewer would be listening for.",
    "Reasonable start, but anchor it in an experience that is closer to the role.",
];

/// Feedback and score for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub feedback: Option<String>,
    pub score: Option<u8>,
}

pub trait Grader: Send + Sync {
    /// `response` is `None` when the item was skipped.
    fn grade(&self, item: &Item, response: Option<&str>) -> Grade;
}

/// Stand-in for a real grader. Ignores the content of the answer.
pub struct PlaceholderGrader {
    rng: Mutex<StdRng>,
}

impl PlaceholderGrader {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible grading, for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Grader for PlaceholderGrader {
    fn grade(&self, _item: &Item, _response: Option<&str>) -> Grade {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let feedback = FEEDBACK_TEMPLATES
            .choose(&mut *rng)
            .map(|template| template.to_string());
        let score = rng.gen_range(MIN_PLACEHOLDER_SCORE..=MAX_PLACEHOLDER_SCORE);
        Grade {
            feedback,
            score: Some(score),
        }
    }
}
