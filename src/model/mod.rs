// File: ./src/model/mod.rs
pub mod markers;
pub mod record;
pub mod schedule;
pub mod span;

pub use markers::{RECORD_FILE, SCHEDULE_FILE, TASK_FILE, Vocabulary, VocabularyPreset};
pub use record::{DeploymentStatus, RecordDocument, RecordFields};
pub use span::DateSpan;
