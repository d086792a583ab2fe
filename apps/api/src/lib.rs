//! Résumé-driven interview practice: upload → analysis → question list →
//! practice session → results, served as a JSON API.

pub mod config;
pub mod errors;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod workflow;

pub use config::Config;
pub use errors::{AppError, WorkflowError};
pub use routes::build_router;
pub use state::AppState;
