//! Remote repository identity and the records read from it.

use super::RemoteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the shared repository the harness force-pushes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryId {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepositoryId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Full name in "owner/name" format.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryId {
    type Err = RemoteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || RemoteError::InvalidRepository {
            value: value.to_string(),
        };

        let (owner, name) = value.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self::new(owner, name))
    }
}

impl TryFrom<String> for RepositoryId {
    type Error = RemoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepositoryId> for String {
    fn from(value: RepositoryId) -> Self {
        value.full_name()
    }
}

/// An open pull request as returned by the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePullRequest {
    /// PR number.
    pub number: u64,

    /// PR title.
    pub title: String,

    /// Raw markdown body, if any.
    pub body: Option<String>,

    /// Label names in the order the API returned them.
    pub labels: Vec<String>,

    /// Source branch of the PR.
    pub head_branch: String,

    /// Whether GitHub auto-merge is armed on the PR.
    pub auto_merge_enabled: bool,
}

/// A branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    /// Branch name without the `refs/heads/` prefix.
    pub name: String,

    /// Head commit SHA.
    pub sha: String,
}

/// A commit on a remote branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCommit {
    /// Commit SHA.
    pub sha: String,

    /// Full commit message.
    pub message: String,
}

/// Outcome of deleting a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchDeletion {
    /// The branch existed and was removed.
    Deleted,

    /// The branch was already gone.
    AlreadyGone,
}
