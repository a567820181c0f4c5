//! One end-to-end scenario against the shared repository.
//!
//! A scenario seeds a scratch checkout, force-pushes it as the default
//! branch, runs Renovate one or more times and asserts what Renovate left
//! behind. Steps run strictly in order; scenarios must not run concurrently
//! against the same repository.

mod definition;
mod error;

pub use definition::{scan_scenarios, RunProtocol, ScenarioDefinition, SeedFile};
pub use error::ScenarioError;

use crate::checks::{wait_for_checks_to_settle, WaitOptions};
use crate::cleanup::{reset_non_default_branches, CleanupReport};
use crate::config::{resolve_renovate_config, ConfigError, HarnessConfig};
use crate::credentials::{resolve_token, Token};
use crate::extract::{extract_commits, extract_pull_requests, CommitInfo, PullRequestInfo};
use crate::git;
use crate::github::{CheckState, GitHubClient, RemoteRepository};
use crate::renovate::{run_renovate, RenovateRun};
use crate::seeds::{BranchPolicyOutcome, SeedRenderer, CODE_OWNERS_PATH, WORKFLOW_PATH};
use crate::snapshot::{validate_at, SnapshotOutcome};
use crate::workspace::ScratchWorkspace;
use std::future::Future;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Name Renovate looks for in the repository root.
pub const RENOVATE_CONFIG_FILE: &str = "renovate.json";

/// Settled check state of one Renovate branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCheck {
    pub branch: String,
    pub state: CheckState,
}

/// A provisioned scenario: scratch checkout plus remote handle.
///
/// The checkout is removed when the scenario is dropped, whichever step
/// failed. Remote state is left as-is for inspection.
pub struct Scenario {
    config: HarnessConfig,
    token: Token,
    remote: Arc<dyn RemoteRepository>,
    workspace: ScratchWorkspace,
    seeds: SeedRenderer,
}

impl Scenario {
    /// Provisions a scenario, resolving the token from the environment or
    /// the GitHub CLI.
    ///
    /// # Errors
    ///
    /// Fails if no token is available or provisioning fails.
    pub async fn create(config: HarnessConfig) -> Result<Self, ScenarioError> {
        let token = resolve_token(&config.token_env).await?;
        Self::create_with_token(config, token).await
    }

    /// Provisions a scenario with an explicit token.
    ///
    /// The Renovate preset is resolved from the git checkout enclosing the
    /// current directory.
    ///
    /// # Errors
    ///
    /// Fails if the preset cannot be found or provisioning fails.
    pub async fn create_with_token(
        config: HarnessConfig,
        token: Token,
    ) -> Result<Self, ScenarioError> {
        let current_dir = std::env::current_dir().map_err(|e| ConfigError::IoError {
            path: ".".to_string(),
            source: e,
        })?;
        let preset = resolve_renovate_config(&config, &current_dir)?;
        let remote = Arc::new(GitHubClient::new(&token)?);
        Self::with_remote(config, token, remote, &preset).await
    }

    /// Provisions a scenario against any remote implementation.
    ///
    /// Creates the scratch checkout, initializes it on the default branch and
    /// copies `preset` in as `renovate.json`.
    ///
    /// # Errors
    ///
    /// Fails if the settings are invalid or the checkout cannot be set up.
    pub async fn with_remote(
        config: HarnessConfig,
        token: Token,
        remote: Arc<dyn RemoteRepository>,
        preset: &Path,
    ) -> Result<Self, ScenarioError> {
        config.validate("<scenario>")?;

        let workspace = ScratchWorkspace::create()?;
        git::init(workspace.path(), &config.default_branch).await?;
        workspace.copy_file(preset, RENOVATE_CONFIG_FILE)?;
        info!(
            workspace = %workspace.path().display(),
            preset = %preset.display(),
            "Scenario workspace ready"
        );

        Ok(Self {
            config,
            token,
            remote,
            workspace,
            seeds: SeedRenderer::new()?,
        })
    }

    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Root of the scratch checkout.
    #[must_use]
    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    /// Seeds a file, verbatim, at `path` relative to the repository root.
    ///
    /// # Errors
    ///
    /// Fails if the path escapes the checkout or the write fails.
    pub fn add_file(&self, path: &str, content: &str) -> Result<(), ScenarioError> {
        self.workspace.add_file(path, content)?;
        Ok(())
    }

    /// Seeds a CI workflow that passes, so the branch policy allows merges.
    ///
    /// # Errors
    ///
    /// Fails if rendering or writing the workflow fails.
    pub fn add_successful_workflow_file(&self) -> Result<(), ScenarioError> {
        self.add_branch_policy_workflow(BranchPolicyOutcome::Success)
    }

    /// Seeds a CI workflow that fails, so automerge has to fall back to a PR.
    ///
    /// # Errors
    ///
    /// Fails if rendering or writing the workflow fails.
    pub fn add_failing_workflow_file(&self) -> Result<(), ScenarioError> {
        self.add_branch_policy_workflow(BranchPolicyOutcome::Failure)
    }

    /// Seeds the branch policy workflow for `outcome`.
    ///
    /// # Errors
    ///
    /// Fails if rendering or writing the workflow fails.
    pub fn add_branch_policy_workflow(
        &self,
        outcome: BranchPolicyOutcome,
    ) -> Result<(), ScenarioError> {
        let workflow = self
            .seeds
            .branch_policy_workflow(outcome, &self.config.default_branch)?;
        self.add_file(WORKFLOW_PATH, &workflow)
    }

    /// Seeds `.github/CODEOWNERS` with the configured owners.
    ///
    /// # Errors
    ///
    /// Fails if rendering or writing the file fails.
    pub fn add_code_owners_file(&self) -> Result<(), ScenarioError> {
        let owners = self.seeds.code_owners(&self.config.code_owners)?;
        self.add_file(CODE_OWNERS_PATH, &owners)
    }

    /// Replaces the remote default branch with the seeded checkout.
    ///
    /// Stale branches are deleted first, then everything is committed and
    /// force-pushed.
    ///
    /// # Errors
    ///
    /// Fails if cleanup, the commit (for example with nothing staged) or the
    /// push fails.
    pub async fn push_files_on_default_branch(&self) -> Result<CleanupReport, ScenarioError> {
        let span = info_span!("push", repo = %self.config.repository, branch = %self.config.default_branch);

        async {
            let report = reset_non_default_branches(
                self.remote.as_ref(),
                &self.config.repository,
                &self.config.default_branch,
            )
            .await?;

            git::commit_all(
                self.workspace.path(),
                &self.config.author(),
                &self.config.commit_message,
            )
            .await?;

            let remote_url = self.config.remote_url(&self.token)?;
            git::force_push(self.workspace.path(), &remote_url, &self.config.default_branch)
                .await?;

            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Runs Renovate once.
    ///
    /// # Errors
    ///
    /// Fails if the container exits non-zero or times out.
    pub async fn run_renovate(&self) -> Result<(), ScenarioError> {
        let run = RenovateRun::from_config(&self.config, &self.token)?;
        run_renovate(&run).await?;
        Ok(())
    }

    /// Waits for the checks on every Renovate branch to settle, sharing one
    /// deadline between all of them.
    ///
    /// A failing check is a settled outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns a timeout error if any branch is still pending at the deadline.
    pub async fn wait_for_branch_policy_checks(&self) -> Result<Vec<BranchCheck>, ScenarioError> {
        let options =
            WaitOptions::with_timeout(self.config.check_poll_interval(), self.config.check_timeout());
        let repo = &self.config.repository;

        let branches = self.remote.list_branches(repo).await?;
        let mut settled = Vec::new();

        for branch in branches
            .into_iter()
            .filter(|b| b.name != self.config.default_branch)
        {
            let state =
                wait_for_checks_to_settle(self.remote.as_ref(), repo, &branch.sha, options)
                    .instrument(info_span!("branch_policy", branch = %branch.name))
                    .await?;
            settled.push(BranchCheck {
                branch: branch.name,
                state,
            });
        }

        if settled.is_empty() {
            warn!("No Renovate branches to wait for");
        }
        Ok(settled)
    }

    /// The two-run automerge protocol.
    ///
    /// The first run opens the branch and lets CI start, the checks are
    /// awaited, and the second run merges on success or opens a pull request
    /// on failure. Renovate keeps no session between the runs.
    ///
    /// # Errors
    ///
    /// Fails if either run fails or the checks time out.
    pub async fn run_automerge_protocol(&self) -> Result<Vec<BranchCheck>, ScenarioError> {
        self.run_renovate().await?;
        let checks = self.wait_for_branch_policy_checks().await?;
        self.run_renovate().await?;
        Ok(checks)
    }

    /// Open pull requests against the default branch, ordered by title.
    ///
    /// # Errors
    ///
    /// Fails if listing fails or a body cannot be extracted.
    pub async fn pull_requests(&self) -> Result<Vec<PullRequestInfo>, ScenarioError> {
        let pulls = self
            .remote
            .list_pull_requests(&self.config.repository, &self.config.default_branch)
            .await?;
        Ok(extract_pull_requests(&pulls)?)
    }

    /// Commits on the default branch, newest first.
    ///
    /// # Errors
    ///
    /// Fails if listing fails.
    pub async fn commits(&self) -> Result<Vec<CommitInfo>, ScenarioError> {
        let commits = self
            .remote
            .list_commits(&self.config.repository, &self.config.default_branch)
            .await?;
        Ok(extract_commits(&commits))
    }

    /// Snapshot-checks the open pull requests against `expected`.
    ///
    /// An empty `expected` records instead of comparing. Mismatches name the
    /// caller's location.
    #[track_caller]
    pub fn assert_pull_requests<'a>(
        &'a self,
        expected: &'a str,
    ) -> impl Future<Output = Result<SnapshotOutcome, ScenarioError>> + 'a {
        let location = Location::caller();
        async move {
            let pulls = self.pull_requests().await?;
            Ok(validate_at(&pulls, Some(expected), location)?)
        }
    }

    /// Snapshot-checks the default branch history against `expected`.
    #[track_caller]
    pub fn assert_commits<'a>(
        &'a self,
        expected: &'a str,
    ) -> impl Future<Output = Result<SnapshotOutcome, ScenarioError>> + 'a {
        let location = Location::caller();
        async move {
            let commits = self.commits().await?;
            Ok(validate_at(&commits, Some(expected), location)?)
        }
    }

    /// Removes the scratch checkout now, reporting removal errors.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be removed.
    pub fn close(self) -> Result<(), ScenarioError> {
        self.workspace.close()?;
        Ok(())
    }
}
