//! Local git operations for seeding the shared remote.
//!
//! Every operation is a single `git -C <path> ...` invocation through
//! [`run_command`], so failures surface with git's own stdout/stderr.

use crate::process::{run_command, CommandOutput, CommandSpec, ProcessError};
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Identity recorded on seed commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    /// `user.name` for the commit.
    pub name: String,
    /// `user.email` for the commit.
    pub email: String,
}

impl CommitAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Creates a new repository at `path` whose first branch is `default_branch`.
pub async fn init(path: &Path, default_branch: &str) -> Result<(), ProcessError> {
    debug!(path = %path.display(), branch = default_branch, "Initializing repository");
    run_git(path, &["init", &format!("--initial-branch={default_branch}")]).await?;
    Ok(())
}

/// Stages everything under `path` and commits it.
///
/// Committing with nothing staged is a git error and is returned as such.
pub async fn commit_all(
    path: &Path,
    author: &CommitAuthor,
    message: &str,
) -> Result<(), ProcessError> {
    debug!(path = %path.display(), message, "Committing workspace");

    run_git(path, &["add", "."]).await?;
    run_git(
        path,
        &[
            "-c",
            &format!("user.email={}", author.email),
            "-c",
            &format!("user.name={}", author.name),
            "commit",
            "--message",
            message,
        ],
    )
    .await?;

    Ok(())
}

/// Overwrites `branch` on `remote_url` with the local `branch`.
///
/// Credentials embedded in the URL are masked in logs and errors.
pub async fn force_push(path: &Path, remote_url: &Url, branch: &str) -> Result<(), ProcessError> {
    let spec = CommandSpec::new("git")
        .args([
            "-C".to_string(),
            path.display().to_string(),
            "push".to_string(),
            remote_url.to_string(),
            format!("{branch}:{branch}"),
            "--force".to_string(),
        ])
        .secret(remote_url.username())
        .secret(remote_url.password().unwrap_or_default());

    run_command(&spec).await?;
    info!(branch, "Force-pushed default branch");
    Ok(())
}

async fn run_git(path: &Path, args: &[&str]) -> Result<CommandOutput, ProcessError> {
    let spec = CommandSpec::new("git")
        .args(["-C".to_string(), path.display().to_string()])
        .args(args.iter().copied());
    run_command(&spec).await
}
