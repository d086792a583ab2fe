//! Axum route handlers for the Workflow API.
//!
//! Handlers only translate HTTP into controller calls; every state change goes
//! through `WorkflowController`.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{SessionOutcome, UploadedDocument};
use crate::state::AppState;
use crate::workflow::{Notification, ResultsSummary, WorkflowSnapshot};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub snapshot: WorkflowSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

#[derive(Debug, Deserialize)]
pub struct BeginSessionRequest {
    /// Ids of the items the user ticked; must be non-empty.
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub outcomes: Vec<SessionOutcome>,
    pub summary: Option<ResultsSummary>,
}

fn respond(state: &AppState, notification: Option<Notification>) -> Json<ActionResponse> {
    Json(ActionResponse {
        snapshot: state.workflow.snapshot(),
        notification,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/workflow
pub async fn handle_get_workflow(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.workflow.snapshot())
}

/// POST /api/v1/workflow/document
///
/// Multipart upload; the `file` field carries the résumé and its content type.
pub async fn handle_submit_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ActionResponse>, AppError> {
    let mut document = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let media_type = field.content_type().unwrap_or_default().to_string();
        let content = field.bytes().await?;
        document = Some(UploadedDocument::new(file_name, media_type, content));
        break;
    }

    let document = document
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let notification = state.workflow.submit_document(document).await?;
    Ok(respond(&state, Some(notification)))
}

/// POST /api/v1/workflow/document/retry
pub async fn handle_retry_analysis(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    let notification = state.workflow.retry_analysis().await?;
    Ok(respond(&state, Some(notification)))
}

/// POST /api/v1/workflow/items
pub async fn handle_request_items(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    let notification = state.workflow.request_items().await?;
    Ok(respond(&state, Some(notification)))
}

/// POST /api/v1/workflow/session
pub async fn handle_begin_session(
    State(state): State<AppState>,
    Json(request): Json<BeginSessionRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    state.workflow.begin_session(&request.selected)?;
    Ok(respond(&state, None))
}

/// POST /api/v1/workflow/session/recording/start
pub async fn handle_start_recording(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    state.workflow.start_recording()?;
    Ok(respond(&state, None))
}

/// POST /api/v1/workflow/session/recording/stop
///
/// Blocks until the transcription has landed.
pub async fn handle_stop_recording(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    state.workflow.stop_recording().await?;
    Ok(respond(&state, None))
}

/// POST /api/v1/workflow/session/skip
pub async fn handle_skip(State(state): State<AppState>) -> Result<Json<ActionResponse>, AppError> {
    let notification = state.workflow.skip()?;
    Ok(respond(&state, notification))
}

/// POST /api/v1/workflow/session/previous
pub async fn handle_previous(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    state.workflow.previous()?;
    Ok(respond(&state, None))
}

/// POST /api/v1/workflow/session/next
pub async fn handle_next(State(state): State<AppState>) -> Result<Json<ActionResponse>, AppError> {
    let notification = state.workflow.next()?;
    Ok(respond(&state, notification))
}

/// POST /api/v1/workflow/item-list
pub async fn handle_return_to_item_list(
    State(state): State<AppState>,
) -> Result<Json<ActionResponse>, AppError> {
    state.workflow.return_to_item_list()?;
    Ok(respond(&state, None))
}

/// POST /api/v1/workflow/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<ActionResponse> {
    state.workflow.reset();
    respond(&state, None)
}

/// GET /api/v1/workflow/results
pub async fn handle_get_results(State(state): State<AppState>) -> Json<ResultsResponse> {
    let snapshot = state.workflow.snapshot();
    Json(ResultsResponse {
        outcomes: snapshot.outcomes,
        summary: snapshot.summary,
    })
}
