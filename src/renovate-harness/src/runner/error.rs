//! Runner error types.

/// Errors that abort a whole run rather than a single scenario.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings, token or scenario loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub API errors.
    #[error(transparent)]
    Remote(#[from] crate::github::RemoteError),

    /// A pull request could not be reduced for inspection.
    #[error(transparent)]
    Extraction(#[from] crate::extract::ExtractionError),

    /// Snapshot rendering errors.
    #[error(transparent)]
    Snapshot(#[from] crate::snapshot::SnapshotError),
}
