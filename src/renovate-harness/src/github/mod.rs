//! Access to the shared remote repository.
//!
//! [`RemoteRepository`] is the narrow set of hosting-service calls the
//! harness consumes. [`GitHubClient`] implements it against the GitHub REST
//! API; tests substitute in-memory implementations.

mod client;
mod error;
mod repository;
mod status;

pub use client::GitHubClient;
pub use error::RemoteError;
pub use repository::{BranchDeletion, RemoteBranch, RemoteCommit, RemotePullRequest, RepositoryId};
pub use status::CheckState;

use async_trait::async_trait;

/// Hosting-service operations used by the harness.
///
/// Implementations are stateless request/response wrappers; nothing about a
/// scenario's progress is stored in them.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Lists open pull requests targeting `base`.
    async fn list_pull_requests(
        &self,
        repo: &RepositoryId,
        base: &str,
    ) -> Result<Vec<RemotePullRequest>, RemoteError>;

    /// Lists every branch of the repository.
    async fn list_branches(&self, repo: &RepositoryId) -> Result<Vec<RemoteBranch>, RemoteError>;

    /// Deletes `branch`, reporting [`BranchDeletion::AlreadyGone`] instead of
    /// failing when it does not exist.
    async fn delete_branch(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<BranchDeletion, RemoteError>;

    /// Reads the combined check state of a commit SHA or ref.
    async fn check_state(
        &self,
        repo: &RepositoryId,
        reference: &str,
    ) -> Result<CheckState, RemoteError>;

    /// Lists commits reachable from `branch`, newest first.
    async fn list_commits(
        &self,
        repo: &RepositoryId,
        branch: &str,
    ) -> Result<Vec<RemoteCommit>, RemoteError>;
}
