pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Workflow controller
        .route("/api/v1/workflow", get(handlers::handle_get_workflow))
        .route(
            "/api/v1/workflow/document",
            post(handlers::handle_submit_document),
        )
        .route(
            "/api/v1/workflow/document/retry",
            post(handlers::handle_retry_analysis),
        )
        .route("/api/v1/workflow/items", post(handlers::handle_request_items))
        .route(
            "/api/v1/workflow/item-list",
            post(handlers::handle_return_to_item_list),
        )
        .route("/api/v1/workflow/reset", post(handlers::handle_reset))
        .route("/api/v1/workflow/results", get(handlers::handle_get_results))
        // Session runner
        .route("/api/v1/workflow/session", post(handlers::handle_begin_session))
        .route(
            "/api/v1/workflow/session/recording/start",
            post(handlers::handle_start_recording),
        )
        .route(
            "/api/v1/workflow/session/recording/stop",
            post(handlers::handle_stop_recording),
        )
        .route("/api/v1/workflow/session/skip", post(handlers::handle_skip))
        .route(
            "/api/v1/workflow/session/previous",
            post(handlers::handle_previous),
        )
        .route("/api/v1/workflow/session/next", post(handlers::handle_next))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
