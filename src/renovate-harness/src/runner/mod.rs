//! Runs declarative scenarios one after another.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::cleanup::{reset_non_default_branches, CleanupReport};
use crate::config::{load_config_or_default, resolve_renovate_config, ConfigError, HarnessConfig};
use crate::credentials::{resolve_token, Token};
use crate::extract::{extract_commits, extract_pull_requests};
use crate::github::{GitHubClient, RemoteRepository};
use crate::scenario::{scan_scenarios, RunProtocol, Scenario, ScenarioDefinition, ScenarioError};
use crate::snapshot::{snapshot_text, validate_at, SnapshotOutcome};
use crate::summary::{RecordedSnapshot, RunSummary, ScenarioOutcome, SnapshotKind};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, info_span, warn, Instrument};

/// Current state of the shared repository, as snapshot text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectReport {
    pub pull_requests: String,
    pub commits: String,
}

/// Drives scenarios against the shared repository.
pub struct Runner {
    config: RunnerConfig,
    harness: HarnessConfig,
    token: Token,
    remote: Arc<dyn RemoteRepository>,
}

impl Runner {
    /// Loads settings, resolves the token and builds the GitHub client.
    ///
    /// # Errors
    ///
    /// Fails if settings are invalid, no token is found or the client cannot
    /// be built.
    pub async fn connect(config: RunnerConfig) -> Result<Self, RunnerError> {
        let harness = load_config_or_default(config.config_path())?;
        let token = match config.token() {
            Some(token) => token.clone(),
            None => resolve_token(&harness.token_env).await?,
        };
        let remote = Arc::new(GitHubClient::new(&token)?);

        Ok(Self::with_remote(config, harness, token, remote))
    }

    /// Builds a runner around an existing remote.
    pub fn with_remote(
        config: RunnerConfig,
        harness: HarnessConfig,
        token: Token,
        remote: Arc<dyn RemoteRepository>,
    ) -> Self {
        Self {
            config,
            harness,
            token,
            remote,
        }
    }

    /// Runs every selected scenario in order.
    ///
    /// A failing scenario is recorded and the run moves on, unless
    /// fail-fast is set.
    ///
    /// # Errors
    ///
    /// Fails only if scenarios or the Renovate preset cannot be loaded.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let current_dir = std::env::current_dir().map_err(|e| ConfigError::IoError {
            path: ".".to_string(),
            source: e,
        })?;
        let preset = resolve_renovate_config(&self.harness, &current_dir)?;

        let scenarios = select_scenarios(
            scan_scenarios(self.config.scenarios_path())?,
            self.config.filter(),
        );
        let mut summary = RunSummary::new(scenarios.len());

        if scenarios.is_empty() {
            warn!("No scenarios selected");
            return Ok(summary);
        }

        for definition in &scenarios {
            let outcome = self.run_scenario(definition, &preset).await;
            let failed = matches!(outcome, ScenarioOutcome::Failed { .. });
            summary.record_outcome(outcome);

            if failed && self.config.fail_fast() {
                warn!("Stopping after first failure");
                break;
            }
        }

        summary.finish();
        Ok(summary)
    }

    async fn run_scenario(&self, definition: &ScenarioDefinition, preset: &Path) -> ScenarioOutcome {
        let span = info_span!("scenario", id = %definition.id, name = %definition.name);

        async {
            info!("Running scenario");
            match self.execute(definition, preset).await {
                Ok(snapshots) if snapshots.is_empty() => {
                    info!("Scenario passed");
                    ScenarioOutcome::Passed {
                        id: definition.id.clone(),
                    }
                }
                Ok(snapshots) => {
                    info!(count = snapshots.len(), "Scenario recorded snapshots");
                    ScenarioOutcome::Recorded {
                        id: definition.id.clone(),
                        snapshots,
                    }
                }
                Err(e) => {
                    error!(error = %e, "Scenario failed");
                    ScenarioOutcome::Failed {
                        id: definition.id.clone(),
                        error: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        definition: &ScenarioDefinition,
        preset: &Path,
    ) -> Result<Vec<RecordedSnapshot>, ScenarioError> {
        let scenario = Scenario::with_remote(
            self.harness.clone(),
            self.token.clone(),
            Arc::clone(&self.remote),
            preset,
        )
        .await?;

        if let Some(outcome) = definition.branch_policy {
            scenario.add_branch_policy_workflow(outcome)?;
        }
        if definition.code_owners {
            scenario.add_code_owners_file()?;
        }
        for file in &definition.files {
            scenario.add_file(&file.path, &file.content)?;
        }

        scenario.push_files_on_default_branch().await?;
        match definition.protocol {
            RunProtocol::SingleRun => scenario.run_renovate().await?,
            RunProtocol::Automerge => {
                scenario.run_automerge_protocol().await?;
            }
        }

        let record_all =
            definition.expected_pull_requests.is_none() && definition.expected_commits.is_none();
        let mut recorded = Vec::new();

        if record_all || definition.expected_pull_requests.is_some() {
            let pulls = scenario.pull_requests().await?;
            let outcome = self.check_snapshot(
                definition,
                &pulls,
                definition.expected_pull_requests.as_deref(),
            )?;
            push_recorded(&mut recorded, SnapshotKind::PullRequests, outcome);
        }
        if record_all || definition.expected_commits.is_some() {
            let commits = scenario.commits().await?;
            let outcome = self.check_snapshot(
                definition,
                &commits,
                definition.expected_commits.as_deref(),
            )?;
            push_recorded(&mut recorded, SnapshotKind::Commits, outcome);
        }

        scenario.close()?;
        Ok(recorded)
    }

    /// Validates against an expectation from `scenario.toml`; mismatches name
    /// that file.
    fn check_snapshot<T: Serialize + ?Sized>(
        &self,
        definition: &ScenarioDefinition,
        actual: &T,
        expected: Option<&str>,
    ) -> Result<SnapshotOutcome, ScenarioError> {
        let location = definition
            .definition_path(self.config.scenarios_path())
            .display()
            .to_string();
        Ok(validate_at(actual, expected, &location)?)
    }

    /// Deletes every non-default branch of the shared repository.
    ///
    /// # Errors
    ///
    /// Fails if listing or deleting branches fails.
    pub async fn cleanup(&self) -> Result<CleanupReport, RunnerError> {
        Ok(reset_non_default_branches(
            self.remote.as_ref(),
            &self.harness.repository,
            &self.harness.default_branch,
        )
        .await?)
    }

    /// Captures the open pull requests and default-branch history as they
    /// would appear in a snapshot. Changes nothing.
    ///
    /// # Errors
    ///
    /// Fails if the remote cannot be read or a pull request body is malformed.
    pub async fn inspect(&self) -> Result<InspectReport, RunnerError> {
        let repo = &self.harness.repository;
        let branch = &self.harness.default_branch;

        let pulls = extract_pull_requests(&self.remote.list_pull_requests(repo, branch).await?)?;
        let commits = extract_commits(&self.remote.list_commits(repo, branch).await?);

        Ok(InspectReport {
            pull_requests: snapshot_text(&pulls)?,
            commits: snapshot_text(&commits)?,
        })
    }

    /// Harness settings in effect.
    pub fn harness(&self) -> &HarnessConfig {
        &self.harness
    }

    /// Scenario directory of this run.
    pub fn scenarios_path(&self) -> &Path {
        self.config.scenarios_path()
    }
}

fn push_recorded(recorded: &mut Vec<RecordedSnapshot>, kind: SnapshotKind, outcome: SnapshotOutcome) {
    if let SnapshotOutcome::Recorded { snapshot } = outcome {
        recorded.push(RecordedSnapshot {
            kind,
            text: snapshot,
        });
    }
}

/// Keeps scenarios whose id or name contains `filter`.
fn select_scenarios(
    scenarios: Vec<ScenarioDefinition>,
    filter: Option<&str>,
) -> Vec<ScenarioDefinition> {
    match filter {
        Some(filter) => scenarios
            .into_iter()
            .filter(|s| s.id.contains(filter) || s.name.contains(filter))
            .collect(),
        None => scenarios,
    }
}
