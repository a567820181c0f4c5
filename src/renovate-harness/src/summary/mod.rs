//! Run summary types and helpers.

mod outcome;
mod run_summary;

pub use outcome::{RecordedSnapshot, ScenarioOutcome, SnapshotKind};
pub use run_summary::RunSummary;
