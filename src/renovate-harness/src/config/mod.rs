//! Harness configuration loading.
//!
//! Settings live in an optional `harness.toml`; every key has a default, so
//! the file only needs to list what differs from the shared test repository.

mod error;
mod harness;

pub use error::ConfigError;
pub use harness::HarnessConfig;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loads and validates settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed or holds
/// invalid values.
pub fn load_config(path: &Path) -> Result<HarnessConfig, ConfigError> {
    info!(path = %path.display(), "Loading harness configuration");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: HarnessConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    config.validate(&path.display().to_string())?;
    debug!(repository = %config.repository, default_branch = %config.default_branch, "Configuration loaded");
    Ok(config)
}

/// Loads `path` when given, otherwise falls back to the defaults.
///
/// # Errors
///
/// Same as [`load_config`].
pub fn load_config_or_default(path: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = HarnessConfig::default();
            config.validate("<defaults>")?;
            Ok(config)
        }
    }
}

/// Walks up from `start` to the first directory containing `.git`.
///
/// # Errors
///
/// Returns [`ConfigError::GitRootNotFound`] when no ancestor is a git checkout.
pub fn find_git_root(start: &Path) -> Result<PathBuf, ConfigError> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::GitRootNotFound {
            start: start.display().to_string(),
        })
}

/// Resolves the Renovate preset under test.
///
/// Absolute paths are used as is; relative ones are taken from the git root
/// above `start`.
///
/// # Errors
///
/// Returns an error if no git root is found or the preset does not exist.
pub fn resolve_renovate_config(
    config: &HarnessConfig,
    start: &Path,
) -> Result<PathBuf, ConfigError> {
    let path = if config.renovate_config.is_absolute() {
        config.renovate_config.clone()
    } else {
        find_git_root(start)?.join(&config.renovate_config)
    };

    if !path.is_file() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = load_config(&dir.path().join("harness.toml"));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn load_reports_toml_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(&path, "default-branch = [").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn load_validates_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(&path, "check-poll-interval-secs = 0").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("harness.toml");
        std::fs::write(&path, "").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.default_branch, "main");
    }

    #[test]
    fn finds_git_root_from_nested_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        let nested = dir.path().join("tests").join("fixtures");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn resolves_preset_relative_to_git_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("default.json"), "{}").unwrap();
        let nested = dir.path().join("tests");
        std::fs::create_dir(&nested).unwrap();

        let path = resolve_renovate_config(&HarnessConfig::default(), &nested).unwrap();

        assert_eq!(path, dir.path().join("default.json"));
    }

    #[test]
    fn missing_preset_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        let result = resolve_renovate_config(&HarnessConfig::default(), dir.path());

        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }
}
