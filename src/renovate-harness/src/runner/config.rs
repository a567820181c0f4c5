//! Runner configuration.

use crate::credentials::Token;
use std::path::{Path, PathBuf};

/// Configuration for a harness run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory scanned for `scenario.toml` folders.
    scenarios_path: PathBuf,
    /// Optional `harness.toml`; defaults apply without one.
    config_path: Option<PathBuf>,
    /// Token given on the command line, skipping discovery.
    token: Option<Token>,
    /// Only run scenarios whose id or name contains this.
    filter: Option<String>,
    /// Stop at the first failed scenario.
    fail_fast: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(scenarios_path: PathBuf) -> Self {
        Self {
            scenarios_path,
            config_path: None,
            token: None,
            filter: None,
            fail_fast: false,
        }
    }

    /// Loads harness settings from `path`.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Uses `token` instead of discovering one.
    pub fn with_token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Restricts the run to matching scenarios.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Stops after the first failure.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn scenarios_path(&self) -> &Path {
        &self.scenarios_path
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }
}
