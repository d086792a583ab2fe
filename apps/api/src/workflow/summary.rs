use serde::Serialize;

use crate::models::SessionOutcome;

/// Coarse rating used when presenting a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Strong,
    Fair,
    NeedsWork,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            8.. => ScoreBand::Strong,
            6..=7 => ScoreBand::Fair,
            _ => ScoreBand::NeedsWork,
        }
    }
}

/// Aggregate view over a finished session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub total: usize,
    pub answered: usize,
    /// Mean of the scores that are present, rounded to one decimal.
    pub average_score: Option<f32>,
    /// One entry per outcome, `None` where the outcome has no score.
    pub bands: Vec<Option<ScoreBand>>,
}

/// `None` when there is nothing to summarize.
pub fn summarize(outcomes: &[SessionOutcome]) -> Option<ResultsSummary> {
    if outcomes.is_empty() {
        return None;
    }

    let scores: Vec<u8> = outcomes.iter().filter_map(|o| o.score).collect();
    let average_score = (!scores.is_empty()).then(|| {
        let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        (total as f32 / scores.len() as f32 * 10.0).round() / 10.0
    });

    Some(ResultsSummary {
        total: outcomes.len(),
        answered: outcomes.iter().filter(|o| o.answered).count(),
        average_score,
        bands: outcomes
            .iter()
            .map(|o| o.score.map(ScoreBand::for_score))
            .collect(),
    })
}
