//! GitHub token discovery.

use crate::config::ConfigError;
use crate::process::{run_command, CommandSpec};
use std::fmt;
use tracing::{debug, info};

/// Environment variable consulted first for the token.
pub const DEFAULT_TOKEN_ENV: &str = "TEST_GITHUB_TOKEN";

/// A GitHub token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw token, for request headers and child environments only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Reads a non-blank token from `var`.
#[must_use]
pub fn token_from_env(var: &str) -> Option<Token> {
    std::env::var(var)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(Token)
}

/// Resolves the token from `var`, falling back to `gh auth token`.
///
/// # Errors
///
/// Returns [`ConfigError::MissingToken`] when neither source yields a token.
pub async fn resolve_token(var: &str) -> Result<Token, ConfigError> {
    if let Some(token) = token_from_env(var) {
        debug!(env_var = var, "Using token from environment");
        return Ok(token);
    }

    info!(env_var = var, "Token not set, asking the GitHub CLI");
    let spec = CommandSpec::new("gh").args(["auth", "token"]).quiet();

    match run_command(&spec).await {
        Ok(output) => {
            let token = output.stdout.trim();
            if token.is_empty() {
                Err(ConfigError::MissingToken {
                    env_var: var.to_string(),
                })
            } else {
                Ok(Token(token.to_string()))
            }
        }
        Err(e) => {
            debug!(error = %e, "GitHub CLI could not provide a token");
            Err(ConfigError::MissingToken {
                env_var: var.to_string(),
            })
        }
    }
}
