//! Branch lifecycle on the shared remote repository.
//!
//! Every branch other than the default one is scratch state left behind by
//! earlier runs. It is removed before each push so Renovate starts clean.

use crate::github::{BranchDeletion, RemoteError, RemoteRepository, RepositoryId};
use tracing::{info, info_span, Instrument};

/// What a cleanup pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Branches this pass deleted.
    pub deleted: Vec<String>,
    /// Branches that disappeared between listing and deletion.
    pub already_gone: Vec<String>,
}

impl CleanupReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.already_gone.is_empty()
    }
}

/// Deletes every branch except `default_branch`, one at a time.
///
/// Safe to repeat: a clean remote yields an empty report.
///
/// # Errors
///
/// Returns an error if listing fails or a deletion fails for any reason
/// other than the branch already being gone.
pub async fn reset_non_default_branches<R>(
    remote: &R,
    repo: &RepositoryId,
    default_branch: &str,
) -> Result<CleanupReport, RemoteError>
where
    R: RemoteRepository + ?Sized,
{
    let span = info_span!("cleanup", repo = %repo, default_branch);

    async {
        let branches = remote.list_branches(repo).await?;
        let mut report = CleanupReport::default();

        for branch in branches.into_iter().filter(|b| b.name != default_branch) {
            info!(branch = %branch.name, "Deleting branch");
            match remote.delete_branch(repo, &branch.name).await? {
                BranchDeletion::Deleted => report.deleted.push(branch.name),
                BranchDeletion::AlreadyGone => {
                    info!(branch = %branch.name, "Branch to delete was not found");
                    report.already_gone.push(branch.name);
                }
            }
        }

        info!(
            deleted = report.deleted.len(),
            already_gone = report.already_gone.len(),
            "Cleanup complete"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}
