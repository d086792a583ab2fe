// The workflow state machine: stages, transitions, and the controller that
// sequences the external service calls.

pub mod controller;
pub mod handlers;
pub mod notification;
pub mod state;
pub mod summary;

pub use controller::{Services, WorkflowController};
pub use notification::Notification;
pub use state::{Stage, WorkflowSnapshot, WorkflowState};
pub use summary::{ResultsSummary, ScoreBand};
