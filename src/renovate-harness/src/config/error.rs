//! Configuration error types.

use thiserror::Error;

/// Errors raised before any remote mutation is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value.
    #[error("Validation error in '{path}': {message}")]
    ValidationError { path: String, message: String },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },

    /// No GitHub token in the environment and `gh` could not supply one.
    #[error("GitHub token not found: set {env_var} or run `gh auth login` to authenticate")]
    MissingToken { env_var: String },

    /// No enclosing git checkout to resolve the Renovate preset from.
    #[error("No git repository found above '{start}'")]
    GitRootNotFound { start: String },
}
