//! Scratch workspace error types.

use thiserror::Error;

/// Errors that can occur while preparing the local checkout.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The temporary directory could not be created.
    #[error("Failed to create scratch workspace: {0}")]
    Create(#[source] std::io::Error),

    /// A seed path escapes the workspace or is absolute.
    #[error("Seed path '{path}' must be relative and stay inside the workspace")]
    InvalidPath { path: String },

    /// Writing or copying a file failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Removing the workspace failed.
    #[error("Failed to remove scratch workspace: {0}")]
    Remove(#[source] std::io::Error),
}
