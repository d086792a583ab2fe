pub mod document;
pub mod item;
pub mod outcome;
pub mod profile;

pub use document::{DocumentKind, DocumentSummary, UploadedDocument};
pub use item::{Category, Difficulty, Item};
pub use outcome::{SessionOutcome, NO_RESPONSE};
pub use profile::{EducationEntry, ExperienceEntry, Profile};
