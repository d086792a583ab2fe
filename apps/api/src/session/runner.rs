//! Session Runner — steps through a fixed item sequence one item at a time.
//!
//! Per-item capture protocol: `Idle → Recording → Processing → Captured`.
//! The runner is synchronous; the controller owns the one suspension
//! (transcription) and reports its result back through
//! [`SessionRunner::complete_processing`] or [`SessionRunner::abort_processing`].

use std::collections::HashMap;

use serde::Serialize;

use crate::errors::WorkflowError;
use crate::models::{Item, SessionOutcome, NO_RESPONSE};
use crate::session::grader::Grader;
use crate::workflow::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    Idle,
    Recording,
    Processing,
    Captured,
}

/// Result of a forward navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Moved { index: usize },
    /// The last item was passed. Outcomes are in item order.
    Finished(Vec<SessionOutcome>),
}

/// Read-only view of the runner for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub index: usize,
    pub total: usize,
    pub progress_percent: u8,
    pub item: Item,
    pub capture: CaptureState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub answered: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRunner {
    items: Vec<Item>,
    index: usize,
    /// item id → captured text; entries are never removed.
    responses: HashMap<String, String>,
    capture: CaptureState,
    finished: bool,
}

fn invalid(op: &'static str, reason: impl Into<String>) -> WorkflowError {
    WorkflowError::invalid(op, Stage::Session, reason)
}

impl SessionRunner {
    /// `None` for an empty item sequence.
    pub fn new(items: Vec<Item>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            items,
            index: 0,
            responses: HashMap::new(),
            capture: CaptureState::Idle,
            finished: false,
        })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capture(&self) -> CaptureState {
        self.capture
    }

    pub fn is_processing(&self) -> bool {
        self.capture == CaptureState::Processing
    }

    pub fn current_item(&self) -> &Item {
        &self.items[self.index]
    }

    pub fn response_for(&self, item_id: &str) -> Option<&str> {
        self.responses.get(item_id).map(String::as_str)
    }

    fn is_last(&self) -> bool {
        self.index + 1 == self.items.len()
    }

    fn ensure_interactive(&self, op: &'static str) -> Result<(), WorkflowError> {
        if self.finished {
            return Err(invalid(op, "the session has already been finalized"));
        }
        if self.is_processing() {
            return Err(WorkflowError::WorkflowBusy);
        }
        Ok(())
    }

    /// Sub-state an item starts in when navigated to.
    fn entry_state(&self, index: usize) -> CaptureState {
        if self.responses.contains_key(&self.items[index].id) {
            CaptureState::Captured
        } else {
            CaptureState::Idle
        }
    }

    fn move_to(&mut self, index: usize) {
        self.index = index;
        self.capture = self.entry_state(index);
    }

    pub fn start_recording(&mut self) -> Result<(), WorkflowError> {
        self.ensure_interactive("start_recording")?;
        match self.capture {
            CaptureState::Idle => {
                self.capture = CaptureState::Recording;
                Ok(())
            }
            CaptureState::Captured => Err(invalid(
                "start_recording",
                "the current item already has a captured response",
            )),
            _ => Err(invalid("start_recording", "a recording is already in progress")),
        }
    }

    /// Moves to `Processing` and hands back the item to transcribe.
    pub fn stop_recording(&mut self) -> Result<Item, WorkflowError> {
        self.ensure_interactive("stop_recording")?;
        if self.capture != CaptureState::Recording {
            return Err(invalid("stop_recording", "no recording is in progress"));
        }
        self.capture = CaptureState::Processing;
        Ok(self.current_item().clone())
    }

    fn ensure_processing(&self, op: &'static str, item_id: &str) -> Result<(), WorkflowError> {
        if !self.is_processing() || self.current_item().id != item_id {
            return Err(invalid(op, format!("item {item_id} is not being processed")));
        }
        Ok(())
    }

    pub fn complete_processing(
        &mut self,
        item_id: &str,
        transcript: String,
    ) -> Result<(), WorkflowError> {
        self.ensure_processing("complete_processing", item_id)?;
        self.responses.insert(item_id.to_string(), transcript);
        self.capture = CaptureState::Captured;
        Ok(())
    }

    /// Transcription failed; the item can be recorded again.
    pub fn abort_processing(&mut self, item_id: &str) -> Result<(), WorkflowError> {
        self.ensure_processing("abort_processing", item_id)?;
        self.capture = CaptureState::Idle;
        Ok(())
    }

    /// Leaves the current item unanswered. Only valid before recording starts.
    pub fn skip(&mut self, grader: &dyn Grader) -> Result<Step, WorkflowError> {
        self.ensure_interactive("skip")?;
        if self.capture != CaptureState::Idle {
            return Err(invalid(
                "skip",
                format!("the current item is {:?}, not idle", self.capture),
            ));
        }
        Ok(self.advance(grader))
    }

    /// Advances past a captured item.
    pub fn next(&mut self, grader: &dyn Grader) -> Result<Step, WorkflowError> {
        self.ensure_interactive("next")?;
        if self.capture != CaptureState::Captured {
            return Err(invalid(
                "next",
                "the current item has no captured response",
            ));
        }
        Ok(self.advance(grader))
    }

    /// Goes back one item. Captured responses are kept; an unfinished
    /// recording on the item being left is abandoned.
    pub fn previous(&mut self) -> Result<usize, WorkflowError> {
        self.ensure_interactive("previous")?;
        if self.index == 0 {
            return Err(invalid("previous", "already at the first item"));
        }
        self.move_to(self.index - 1);
        Ok(self.index)
    }

    fn advance(&mut self, grader: &dyn Grader) -> Step {
        if self.is_last() {
            Step::Finished(self.finalize(grader))
        } else {
            self.move_to(self.index + 1);
            Step::Moved { index: self.index }
        }
    }

    /// Builds one outcome per item in the original order, independent of
    /// the order items were visited in.
    fn finalize(&mut self, grader: &dyn Grader) -> Vec<SessionOutcome> {
        self.finished = true;
        self.items
            .iter()
            .map(|item| {
                let captured = self.responses.get(&item.id).map(String::as_str);
                let grade = grader.grade(item, captured);
                SessionOutcome {
                    item_id: item.id.clone(),
                    prompt: item.text.clone(),
                    response: captured.unwrap_or(NO_RESPONSE).to_string(),
                    answered: captured.is_some(),
                    feedback: grade.feedback,
                    score: grade.score,
                }
            })
            .collect()
    }

    pub fn view(&self) -> SessionView {
        let total = self.items.len();
        let progress = ((self.index + 1) as f64 / total as f64 * 100.0).round() as u8;
        let item = self.current_item().clone();
        let response = self.response_for(&item.id).map(str::to_string);
        SessionView {
            index: self.index,
            total,
            progress_percent: progress,
            item,
            capture: self.capture,
            response,
            answered: self.responses.len(),
        }
    }
}
