//! Workflow state and its synchronous transitions.
//!
//! Every suspending operation is split in two: a `begin_*` step that
//! validates, marks the state busy and hands back the service input, and a
//! `finish_*` step that applies the service result. The controller runs the
//! service call between them without holding the state lock.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::errors::WorkflowError;
use crate::models::{DocumentSummary, Item, Profile, SessionOutcome, UploadedDocument};
use crate::session::{SessionRunner, SessionView};
use crate::workflow::summary::{summarize, ResultsSummary};

/// The five mutually exclusive phases of the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Upload,
    Analysis,
    ItemList,
    Session,
    Results,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Upload => "upload",
            Stage::Analysis => "analysis",
            Stage::ItemList => "item_list",
            Stage::Session => "session",
            Stage::Results => "results",
        };
        f.write_str(label)
    }
}

/// Single source of truth for one workflow. Fields are only mutated
/// through the transition methods below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    stage: Stage,
    document: Option<UploadedDocument>,
    profile: Option<Profile>,
    items: Vec<Item>,
    outcomes: Vec<SessionOutcome>,
    busy: bool,
    session: Option<SessionRunner>,
}

/// Serializable view handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub stage: Stage,
    pub busy: bool,
    pub document: Option<DocumentSummary>,
    pub profile: Option<Profile>,
    pub items: Vec<Item>,
    pub session: Option<SessionView>,
    pub outcomes: Vec<SessionOutcome>,
    pub summary: Option<ResultsSummary>,
}

impl WorkflowState {
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn outcomes(&self) -> &[SessionOutcome] {
        &self.outcomes
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn session(&self) -> Option<&SessionRunner> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            stage: self.stage,
            busy: self.busy,
            document: self.document.as_ref().map(UploadedDocument::summary),
            profile: self.profile.clone(),
            items: self.items.clone(),
            session: self.session.as_ref().map(SessionRunner::view),
            outcomes: self.outcomes.clone(),
            summary: summarize(&self.outcomes),
        }
    }

    fn invalid(&self, op: &'static str, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::invalid(op, self.stage, reason)
    }

    /// Rejects everything while a controller call or a transcription is outstanding.
    fn ensure_ready(&self) -> Result<(), WorkflowError> {
        let transcribing = self.session.as_ref().is_some_and(SessionRunner::is_processing);
        if self.busy || transcribing {
            return Err(WorkflowError::WorkflowBusy);
        }
        Ok(())
    }

    fn ensure_stage(&self, op: &'static str, allowed: &[Stage]) -> Result<(), WorkflowError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(self.invalid(op, format!("allowed only in {allowed:?}")))
        }
    }

    // ── Document analysis ───────────────────────────────────────────────

    pub(crate) fn begin_submit(
        &mut self,
        document: UploadedDocument,
    ) -> Result<UploadedDocument, WorkflowError> {
        self.ensure_ready()?;
        self.ensure_stage("submit_document", &[Stage::Upload])?;
        if document.kind().is_none() {
            return Err(WorkflowError::UnsupportedMediaType(document.media_type));
        }
        self.document = Some(document.clone());
        self.busy = true;
        Ok(document)
    }

    /// Re-runs analysis on the retained document after a failure.
    pub(crate) fn begin_retry_analysis(&mut self) -> Result<UploadedDocument, WorkflowError> {
        self.ensure_ready()?;
        self.ensure_stage("retry_analysis", &[Stage::Upload])?;
        let document = self
            .document
            .clone()
            .ok_or_else(|| self.invalid("retry_analysis", "no document has been submitted"))?;
        self.busy = true;
        Ok(document)
    }

    pub(crate) fn finish_submit(&mut self, result: Result<Profile, String>) -> Result<(), WorkflowError> {
        self.busy = false;
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.stage = Stage::Analysis;
                Ok(())
            }
            Err(reason) => {
                self.stage = Stage::Upload;
                Err(WorkflowError::AnalysisFailed(reason))
            }
        }
    }

    // ── Item generation ─────────────────────────────────────────────────

    pub(crate) fn begin_request_items(&mut self) -> Result<Profile, WorkflowError> {
        self.ensure_ready()?;
        let retrying = self.stage == Stage::ItemList && self.items.is_empty();
        if self.stage != Stage::Analysis && !retrying {
            return Err(self.invalid(
                "request_items",
                "allowed only from analysis, or from an empty item list",
            ));
        }
        let profile = self
            .profile
            .clone()
            .ok_or_else(|| self.invalid("request_items", "no profile is available"))?;
        self.stage = Stage::ItemList;
        self.items.clear();
        self.busy = true;
        Ok(profile)
    }

    /// Stores the generated items, or leaves the list empty on any failure.
    /// An empty set or duplicate ids count as a failure.
    pub(crate) fn finish_request_items(
        &mut self,
        result: Result<Vec<Item>, String>,
    ) -> Result<usize, WorkflowError> {
        self.busy = false;
        let items = result
            .and_then(|items| validate_items(&items).map(|()| items))
            .map_err(WorkflowError::GenerationFailed)?;
        self.items = items;
        Ok(self.items.len())
    }

    // ── Session ─────────────────────────────────────────────────────────

    pub(crate) fn begin_session(&mut self, selected: &[String]) -> Result<(), WorkflowError> {
        self.ensure_ready()?;
        self.ensure_stage("begin_session", &[Stage::ItemList])?;
        if selected.is_empty() {
            return Err(self.invalid("begin_session", "at least one item must be selected"));
        }
        if let Some(unknown) = selected
            .iter()
            .find(|id| !self.items.iter().any(|item| &item.id == *id))
        {
            return Err(self.invalid("begin_session", format!("unknown item id '{unknown}'")));
        }
        let runner = SessionRunner::new(self.items.clone())
            .ok_or_else(|| self.invalid("begin_session", "the item list is empty"))?;
        self.outcomes.clear();
        self.session = Some(runner);
        self.stage = Stage::Session;
        Ok(())
    }

    /// The active runner, for user-initiated session operations.
    pub(crate) fn session_mut(&mut self, op: &'static str) -> Result<&mut SessionRunner, WorkflowError> {
        self.ensure_ready()?;
        self.active_session(op)
    }

    /// The active runner without the busy gate; used to land a transcription.
    pub(crate) fn active_session(
        &mut self,
        op: &'static str,
    ) -> Result<&mut SessionRunner, WorkflowError> {
        if self.stage != Stage::Session {
            return Err(self.invalid(op, "no session is active"));
        }
        let stage = self.stage;
        self.session
            .as_mut()
            .ok_or_else(|| WorkflowError::invalid(op, stage, "no session is active"))
    }

    /// Accepts the outcomes of a finished session; they must match the
    /// session's items one-to-one and in order.
    pub(crate) fn complete_session(
        &mut self,
        outcomes: Vec<SessionOutcome>,
    ) -> Result<(), WorkflowError> {
        self.ensure_ready()?;
        self.ensure_stage("complete_session", &[Stage::Session])?;
        let runner = self
            .session
            .as_ref()
            .ok_or_else(|| self.invalid("complete_session", "no session is active"))?;
        let matches = runner.items().len() == outcomes.len()
            && runner
                .items()
                .iter()
                .zip(&outcomes)
                .all(|(item, outcome)| item.id == outcome.item_id);
        if !matches {
            return Err(self.invalid(
                "complete_session",
                "outcomes must match the session items one-to-one and in order",
            ));
        }
        self.outcomes = outcomes;
        self.session = None;
        self.stage = Stage::Results;
        Ok(())
    }

    pub(crate) fn return_to_item_list(&mut self) -> Result<(), WorkflowError> {
        self.ensure_ready()?;
        self.ensure_stage("return_to_item_list", &[Stage::Session, Stage::Results])?;
        self.session = None;
        self.stage = Stage::ItemList;
        Ok(())
    }

    /// Clears the busy flag of a service call whose caller went away before
    /// the result landed. Stage and retained inputs stay as they were, so
    /// the call can be retried.
    pub(crate) fn abandon_call(&mut self) {
        self.busy = false;
    }

    /// Back to a freshly initialized state, from anywhere.
    pub(crate) fn reset(&mut self) {
        *self = WorkflowState::default();
    }
}

fn validate_items(items: &[Item]) -> Result<(), String> {
    if items.is_empty() {
        return Err("the generator returned no items".to_string());
    }
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(format!("duplicate item id '{}'", item.id));
        }
    }
    Ok(())
}
