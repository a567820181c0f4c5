//! Runs Renovate in a throwaway container.
//!
//! Each call is independent; multi-run protocols such as automerge are
//! choreographed by the scenario, not here.

use crate::config::{ConfigError, HarnessConfig};
use crate::credentials::Token;
use crate::github::RepositoryId;
use crate::process::{run_command, CommandOutput, CommandSpec, ProcessError};
use std::time::Duration;
use tracing::{info, info_span, Instrument};

/// Everything passed to one Renovate invocation. Built fresh per run.
#[derive(Debug, Clone)]
pub struct RenovateRun {
    pub image: String,
    pub token: Token,
    pub repository: RepositoryId,
    /// HTTPS URL placed in `RENOVATE_REPOSITORIES`.
    pub repository_url: String,
    pub log_level: String,
    pub print_config: bool,
    pub recreate_when: String,
    pub inherit_config_file_name: String,
    pub timeout: Option<Duration>,
}

impl RenovateRun {
    /// Builds the run surface from harness settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository URL cannot be built.
    pub fn from_config(config: &HarnessConfig, token: &Token) -> Result<Self, ConfigError> {
        Ok(Self {
            image: config.renovate_image.clone(),
            token: token.clone(),
            repository: config.repository.clone(),
            repository_url: config.repository_url()?.to_string(),
            log_level: config.log_level.clone(),
            print_config: true,
            recreate_when: config.recreate_when.clone(),
            inherit_config_file_name: config.inherit_config_file_name.clone(),
            timeout: config.tool_timeout(),
        })
    }

    /// The `docker run` invocation.
    ///
    /// The token travels in the child environment and is forwarded by name,
    /// so it never shows up on the command line.
    #[must_use]
    pub fn docker_command(&self) -> CommandSpec {
        // serde_json escapes the URL exactly as Renovate parses it.
        let repositories = serde_json::Value::from(vec![self.repository_url.clone()]).to_string();

        let variables = [
            format!("LOG_LEVEL={}", self.log_level),
            format!("RENOVATE_PRINT_CONFIG={}", self.print_config),
            "RENOVATE_TOKEN".to_string(),
            format!("RENOVATE_RECREATE_WHEN={}", self.recreate_when),
            format!(
                "RENOVATE_INHERIT_CONFIG_FILE_NAME={}",
                self.inherit_config_file_name
            ),
            format!("RENOVATE_REPOSITORIES={repositories}"),
        ];

        let spec = CommandSpec::new("docker")
            .args(["run", "--rm"])
            .args(variables.into_iter().flat_map(|variable| ["-e".to_string(), variable]))
            .arg(&self.image)
            .arg("renovate")
            .arg(self.repository.full_name())
            .env("RENOVATE_TOKEN", self.token.expose())
            .secret(self.token.expose());

        match self.timeout {
            Some(timeout) => spec.timeout(timeout),
            None => spec,
        }
    }
}

/// Runs Renovate to completion against the configured repository.
///
/// # Errors
///
/// Returns [`ProcessError`] if the container exits non-zero or times out.
pub async fn run_renovate(run: &RenovateRun) -> Result<CommandOutput, ProcessError> {
    let span = info_span!("renovate", repository = %run.repository, image = %run.image);

    async {
        info!("Running Renovate");
        let output = run_command(&run.docker_command()).await?;
        info!("Renovate finished");
        Ok(output)
    }
    .instrument(span)
    .await
}
