//! Snapshot error types.

use thiserror::Error;

/// Errors from snapshot validation.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The value could not be rendered to YAML.
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// The scrub pattern failed to compile.
    #[error("Invalid scrub pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The captured text differs from the expected literal.
    #[error("Snapshot mismatch at {location}\n{diff}")]
    Mismatch {
        location: String,
        expected: String,
        actual: String,
        diff: String,
    },
}
