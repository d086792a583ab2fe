// Interactive session: stepping through generated items and grading them.

pub mod grader;
pub mod runner;

pub use grader::{Grade, Grader, PlaceholderGrader};
pub use runner::{CaptureState, SessionRunner, SessionView, Step};
