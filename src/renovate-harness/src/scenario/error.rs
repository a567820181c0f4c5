//! Scenario error types.

use crate::checks::ChecksError;
use crate::config::ConfigError;
use crate::extract::ExtractionError;
use crate::github::RemoteError;
use crate::process::ProcessError;
use crate::seeds::SeedError;
use crate::snapshot::SnapshotError;
use crate::workspace::WorkspaceError;
use thiserror::Error;

/// Anything that can fail a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// git or docker exited non-zero or timed out.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Missing token or unusable settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A GitHub API call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The scratch checkout could not be written or removed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// A pull request body lacks the update table.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Checks did not settle in time.
    #[error(transparent)]
    Checks(#[from] ChecksError),

    /// Captured state differs from the expectation.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// A built-in seed file failed to render.
    #[error(transparent)]
    Seed(#[from] SeedError),
}
