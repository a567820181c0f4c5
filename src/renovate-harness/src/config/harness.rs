//! Harness settings.

use crate::config::ConfigError;
use crate::credentials::Token;
use crate::git::CommitAuthor;
use crate::github::RepositoryId;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Where and how the harness runs Renovate.
///
/// Every field has a default matching the shared test repository, so an
/// empty `harness.toml` (or none at all) is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Shared repository that every scenario force-pushes to.
    pub repository: RepositoryId,

    /// Hosting service hostname.
    pub host: String,

    /// Branch that scenarios overwrite; every other branch is scratch state.
    pub default_branch: String,

    /// Container image that runs Renovate.
    pub renovate_image: String,

    /// Renovate preset under test, relative to the git root unless absolute.
    pub renovate_config: PathBuf,

    /// `LOG_LEVEL` passed to Renovate.
    pub log_level: String,

    /// `RENOVATE_RECREATE_WHEN` passed to Renovate.
    pub recreate_when: String,

    /// `RENOVATE_INHERIT_CONFIG_FILE_NAME`; points at a file that never exists.
    pub inherit_config_file_name: String,

    /// `user.name` of seed commits.
    pub author_name: String,

    /// `user.email` of seed commits.
    pub author_email: String,

    /// Message of the seed commit on the default branch.
    pub commit_message: String,

    /// Owners written to `.github/CODEOWNERS` by the code-owners seed.
    pub code_owners: Vec<String>,

    /// Environment variable holding the GitHub token.
    pub token_env: String,

    /// Delay between check-status polls.
    pub check_poll_interval_secs: u64,

    /// Upper bound for checks to settle.
    pub check_timeout_secs: u64,

    /// Upper bound for a single Renovate run; unbounded when absent.
    pub tool_timeout_secs: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryId::new("gsoft-inc", "renovate-config-test"),
            host: "github.com".to_string(),
            default_branch: "main".to_string(),
            renovate_image: "renovate/renovate:latest".to_string(),
            renovate_config: PathBuf::from("default.json"),
            log_level: "debug".to_string(),
            recreate_when: "always".to_string(),
            inherit_config_file_name: "not-renovate.json".to_string(),
            author_name: "IDP ScaffoldIt".to_string(),
            author_email: "idp@workleap.com".to_string(),
            commit_message: "IDP ScaffoldIt automated test".to_string(),
            code_owners: vec!["@gsoft-inc/internal-developer-platform".to_string()],
            token_env: crate::credentials::DEFAULT_TOKEN_ENV.to_string(),
            check_poll_interval_secs: 10,
            check_timeout_secs: 600,
            tool_timeout_secs: None,
        }
    }
}

impl HarnessConfig {
    /// Checks that every setting is usable.
    ///
    /// `origin` names the file the settings came from, for error messages.
    pub fn validate(&self, origin: &str) -> Result<(), ConfigError> {
        let fail = |message: String| {
            Err(ConfigError::ValidationError {
                path: origin.to_string(),
                message,
            })
        };

        if !is_valid_branch_name(&self.default_branch) {
            return fail(format!(
                "default-branch '{}' is not a valid branch name",
                self.default_branch
            ));
        }

        if Url::parse(&format!("https://{}/", self.host)).is_err() || self.host.contains('/') {
            return fail(format!("host '{}' is not a valid hostname", self.host));
        }

        for (field, value) in [
            ("renovate-image", &self.renovate_image),
            ("log-level", &self.log_level),
            ("recreate-when", &self.recreate_when),
            ("inherit-config-file-name", &self.inherit_config_file_name),
            ("author-name", &self.author_name),
            ("commit-message", &self.commit_message),
            ("token-env", &self.token_env),
        ] {
            if value.trim().is_empty() {
                return fail(format!("{field} must not be empty"));
            }
        }

        if !self.author_email.contains('@') {
            return fail(format!(
                "author-email '{}' is not an email address",
                self.author_email
            ));
        }

        if self.check_poll_interval_secs == 0 {
            return fail("check-poll-interval-secs must be greater than zero".to_string());
        }

        if self.check_timeout_secs < self.check_poll_interval_secs {
            return fail(format!(
                "check-timeout-secs ({}) must be at least check-poll-interval-secs ({})",
                self.check_timeout_secs, self.check_poll_interval_secs
            ));
        }

        if self.tool_timeout_secs == Some(0) {
            return fail("tool-timeout-secs must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Identity used for seed commits.
    #[must_use]
    pub fn author(&self) -> CommitAuthor {
        CommitAuthor::new(&self.author_name, &self.author_email)
    }

    /// Public HTTPS URL of the repository, as Renovate expects it.
    pub fn repository_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&format!("https://{}/{}", self.host, self.repository.full_name())).map_err(
            |e| ConfigError::ValidationError {
                path: "repository".to_string(),
                message: e.to_string(),
            },
        )
    }

    /// Repository URL with the token embedded, for `git push`.
    pub fn remote_url(&self, token: &Token) -> Result<Url, ConfigError> {
        let mut url = self.repository_url()?;
        url.set_username(token.expose())
            .map_err(|()| ConfigError::ValidationError {
                path: "repository".to_string(),
                message: "cannot embed credentials in repository URL".to_string(),
            })?;
        Ok(url)
    }

    #[must_use]
    pub fn check_poll_interval(&self) -> Duration {
        Duration::from_secs(self.check_poll_interval_secs)
    }

    #[must_use]
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    #[must_use]
    pub fn tool_timeout(&self) -> Option<Duration> {
        self.tool_timeout_secs.map(Duration::from_secs)
    }
}

/// Subset of git's ref-name rules that matter for a refspec `branch:branch`.
fn is_valid_branch_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(['-', '/', '.'])
        && !name.ends_with(['/', '.'])
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c))
}
