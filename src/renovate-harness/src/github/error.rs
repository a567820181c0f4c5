//! Remote repository error types.

use thiserror::Error;

/// Errors that can occur while talking to the hosting service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// A repository identifier was not of the form `owner/name`.
    #[error("Invalid repository '{value}': expected 'owner/name'")]
    InvalidRepository { value: String },
}
