//! Workflow Controller — drives the workflow and calls the external services.
//!
//! Shared as `Arc<WorkflowController>`. The state lock is a plain
//! `std::sync::Mutex` held only for synchronous transitions, never across an
//! await, so a second caller sees `busy` and gets `WorkflowBusy` instead of
//! queueing behind the first.
//!
//! `reset()` bumps an epoch. A service call that finishes under an older
//! epoch has its result dropped.
//!
//! If a caller is dropped mid-call (a disconnected HTTP client), an
//! `InFlight` guard releases the busy marker it left behind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::errors::WorkflowError;
use crate::models::{SessionOutcome, UploadedDocument};
use crate::services::{DocumentAnalyzer, ItemGenerator, Transcriber};
use crate::session::{Grader, SessionView, Step};
use crate::workflow::notification::Notification;
use crate::workflow::state::{WorkflowSnapshot, WorkflowState};

/// The collaborators a controller is built from.
#[derive(Clone)]
pub struct Services {
    pub analyzer: Arc<dyn DocumentAnalyzer>,
    pub generator: Arc<dyn ItemGenerator>,
    pub transcriber: Arc<dyn Transcriber>,
    pub grader: Arc<dyn Grader>,
}

#[derive(Default)]
struct Inner {
    state: WorkflowState,
    epoch: u64,
}

pub struct WorkflowController {
    inner: Mutex<Inner>,
    services: Services,
}

impl WorkflowController {
    pub fn new(services: Services) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            services,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state.
    pub fn state(&self) -> WorkflowState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.lock().state.snapshot()
    }

    // ── Document analysis ───────────────────────────────────────────────

    pub async fn submit_document(
        &self,
        document: UploadedDocument,
    ) -> Result<Notification, WorkflowError> {
        let (document, epoch) = {
            let mut inner = self.lock();
            let document = inner.state.begin_submit(document).inspect_err(|e| {
                warn!("Rejected document submission: {e}");
            })?;
            (document, inner.epoch)
        };
        self.run_analysis(document, epoch).await
    }

    /// Analyzes the retained document again after a failed attempt.
    pub async fn retry_analysis(&self) -> Result<Notification, WorkflowError> {
        let (document, epoch) = {
            let mut inner = self.lock();
            let document = inner.state.begin_retry_analysis()?;
            (document, inner.epoch)
        };
        self.run_analysis(document, epoch).await
    }

    async fn run_analysis(
        &self,
        document: UploadedDocument,
        epoch: u64,
    ) -> Result<Notification, WorkflowError> {
        info!(
            "Analyzing '{}' ({}, {} bytes)",
            document.file_name,
            document.media_type,
            document.content.len()
        );
        let guard = InFlight::new(self, epoch, "submit_document");
        let result = self
            .services
            .analyzer
            .analyze(&document)
            .await
            .map_err(|e| e.to_string());
        guard.landed();

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("Discarding analysis result: workflow was reset while it was in flight");
            return Err(superseded("submit_document", &inner.state));
        }
        match inner.state.finish_submit(result) {
            Ok(()) => {
                info!("Document analyzed");
                Ok(Notification::document_analyzed())
            }
            Err(e) => {
                warn!("{e}");
                Err(e)
            }
        }
    }

    // ── Item generation ─────────────────────────────────────────────────

    pub async fn request_items(&self) -> Result<Notification, WorkflowError> {
        let (profile, epoch) = {
            let mut inner = self.lock();
            let profile = inner.state.begin_request_items()?;
            (profile, inner.epoch)
        };

        info!("Generating items for {}", profile.name);
        let guard = InFlight::new(self, epoch, "request_items");
        let result = self
            .services
            .generator
            .generate_items(&profile)
            .await
            .map_err(|e| e.to_string());
        guard.landed();

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("Discarding generated items: workflow was reset while generation was in flight");
            return Err(superseded("request_items", &inner.state));
        }
        match inner.state.finish_request_items(result) {
            Ok(count) => {
                info!("Generated {count} items");
                Ok(Notification::items_generated(count))
            }
            Err(e) => {
                warn!("{e}");
                Err(e)
            }
        }
    }

    // ── Session ─────────────────────────────────────────────────────────

    pub fn begin_session(&self, selected: &[String]) -> Result<SessionView, WorkflowError> {
        let mut inner = self.lock();
        inner.state.begin_session(selected)?;
        info!(
            "Session started over {} items ({} selected)",
            inner.state.items().len(),
            selected.len()
        );
        inner
            .state
            .active_session("begin_session")
            .map(|runner| runner.view())
    }

    pub fn start_recording(&self) -> Result<SessionView, WorkflowError> {
        let mut inner = self.lock();
        let runner = inner.state.session_mut("start_recording")?;
        runner.start_recording()?;
        Ok(runner.view())
    }

    /// Stops recording and waits for the transcription to land.
    pub async fn stop_recording(&self) -> Result<SessionView, WorkflowError> {
        let (item, epoch) = {
            let mut inner = self.lock();
            let item = inner.state.session_mut("stop_recording")?.stop_recording()?;
            (item, inner.epoch)
        };

        let guard = InFlight::new(self, epoch, "stop_recording").transcribing(&item.id);
        let result = self.services.transcriber.transcribe(&item).await;
        guard.landed();

        let mut inner = self.lock();
        if inner.epoch != epoch {
            warn!("Discarding transcript for item {}: workflow was reset", item.id);
            return Err(superseded("stop_recording", &inner.state));
        }
        let runner = inner.state.active_session("stop_recording")?;
        match result {
            Ok(transcript) => {
                runner.complete_processing(&item.id, transcript)?;
                Ok(runner.view())
            }
            Err(e) => {
                runner.abort_processing(&item.id)?;
                warn!("Transcription failed for item {}: {e}", item.id);
                Err(WorkflowError::TranscriptionFailed(e.to_string()))
            }
        }
    }

    /// Returns a notification when the skip finished the session.
    pub fn skip(&self) -> Result<Option<Notification>, WorkflowError> {
        let mut inner = self.lock();
        let step = inner
            .state
            .session_mut("skip")?
            .skip(self.services.grader.as_ref())?;
        finish_step(&mut inner.state, step)
    }

    /// Returns a notification when the move finished the session.
    pub fn next(&self) -> Result<Option<Notification>, WorkflowError> {
        let mut inner = self.lock();
        let step = inner
            .state
            .session_mut("next")?
            .next(self.services.grader.as_ref())?;
        finish_step(&mut inner.state, step)
    }

    pub fn previous(&self) -> Result<SessionView, WorkflowError> {
        let mut inner = self.lock();
        let runner = inner.state.session_mut("previous")?;
        runner.previous()?;
        Ok(runner.view())
    }

    /// Stores a finished session's outcomes and moves to results.
    pub fn complete_session(
        &self,
        outcomes: Vec<SessionOutcome>,
    ) -> Result<Notification, WorkflowError> {
        let mut inner = self.lock();
        complete(&mut inner.state, outcomes)
    }

    pub fn return_to_item_list(&self) -> Result<(), WorkflowError> {
        self.lock().state.return_to_item_list()
    }

    /// Allowed from every stage, including while a service call is in flight.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state.reset();
        inner.epoch += 1;
        info!("Workflow reset");
    }
}

/// Held across a service call. If the calling future is dropped before the
/// result lands, the busy marker it set is released so the workflow does not
/// stay wedged. Ignored once the epoch has moved on.
struct InFlight<'a> {
    controller: &'a WorkflowController,
    epoch: u64,
    op: &'static str,
    transcribing: Option<String>,
    landed: bool,
}

impl<'a> InFlight<'a> {
    fn new(controller: &'a WorkflowController, epoch: u64, op: &'static str) -> Self {
        Self {
            controller,
            epoch,
            op,
            transcribing: None,
            landed: false,
        }
    }

    fn transcribing(mut self, item_id: &str) -> Self {
        self.transcribing = Some(item_id.to_string());
        self
    }

    /// The result is back; the caller applies it from here on.
    fn landed(mut self) {
        self.landed = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.landed {
            return;
        }
        let mut inner = self.controller.lock();
        if inner.epoch != self.epoch {
            return;
        }
        warn!("{} was abandoned by its caller before the result landed", self.op);
        match &self.transcribing {
            Some(item_id) => {
                if let Ok(runner) = inner.state.active_session(self.op) {
                    let _ = runner.abort_processing(item_id);
                }
            }
            None => inner.state.abandon_call(),
        }
    }
}

fn complete(
    state: &mut WorkflowState,
    outcomes: Vec<SessionOutcome>,
) -> Result<Notification, WorkflowError> {
    let count = outcomes.len();
    state.complete_session(outcomes)?;
    info!("Session completed with {count} outcomes");
    Ok(Notification::session_completed(count))
}

fn finish_step(
    state: &mut WorkflowState,
    step: Step,
) -> Result<Option<Notification>, WorkflowError> {
    match step {
        Step::Moved { .. } => Ok(None),
        Step::Finished(outcomes) => complete(state, outcomes).map(Some),
    }
}

fn superseded(op: &'static str, state: &WorkflowState) -> WorkflowError {
    WorkflowError::invalid(
        op,
        state.stage(),
        "the workflow was reset while the operation was in flight",
    )
}
