//! Declarative scenarios loaded from disk.
//!
//! ```text
//! scenarios/
//! └── hangfire-grouped/
//!     ├── scenario.toml
//!     └── files/
//!         └── project.csproj
//! ```
//!
//! Everything under `files/` is seeded verbatim at the same relative path.

use crate::config::ConfigError;
use crate::seeds::BranchPolicyOutcome;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const DEFINITION_FILE: &str = "scenario.toml";
const FILES_DIR: &str = "files";

/// How many times Renovate runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunProtocol {
    /// One run, then assert.
    #[default]
    SingleRun,
    /// Run, wait for branch checks, run again.
    Automerge,
}

/// One seed file, path relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFile {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct DefinitionFile {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    branch_policy: Option<BranchPolicyOutcome>,
    #[serde(default)]
    code_owners: bool,
    #[serde(default)]
    protocol: RunProtocol,
    #[serde(default)]
    expected_pull_requests: Option<String>,
    #[serde(default)]
    expected_commits: Option<String>,
}

/// A scenario ready to hand to the runner.
#[derive(Debug, Clone)]
pub struct ScenarioDefinition {
    /// Folder path relative to the scan root, e.g. `"hangfire-grouped"`.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Seeds the branch policy workflow with this outcome when set.
    pub branch_policy: Option<BranchPolicyOutcome>,
    /// Seeds `.github/CODEOWNERS` when true.
    pub code_owners: bool,
    pub protocol: RunProtocol,
    /// Expected pull request snapshot; empty records instead of comparing.
    pub expected_pull_requests: Option<String>,
    /// Expected commit snapshot; empty records instead of comparing.
    pub expected_commits: Option<String>,
    /// Sorted by path.
    pub files: Vec<SeedFile>,
}

impl ScenarioDefinition {
    /// Path of the `scenario.toml` this definition was loaded from, given the
    /// scan root.
    #[must_use]
    pub fn definition_path(&self, root: &Path) -> PathBuf {
        root.join(&self.id).join(DEFINITION_FILE)
    }

    /// Loads the scenario in `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `scenario.toml` is missing or invalid, or a
    /// seed file cannot be read.
    pub fn load(path: &Path, id: &str) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), id, "Loading scenario");

        let definition_path = path.join(DEFINITION_FILE);
        let content =
            std::fs::read_to_string(&definition_path).map_err(|e| ConfigError::IoError {
                path: definition_path.display().to_string(),
                source: e,
            })?;
        let file: DefinitionFile =
            toml::from_str(&content).map_err(|e| ConfigError::TomlError {
                path: definition_path.display().to_string(),
                source: e,
            })?;

        let invalid = |message: &str| ConfigError::ValidationError {
            path: definition_path.display().to_string(),
            message: message.to_string(),
        };

        if file.name.trim().is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if file.protocol == RunProtocol::Automerge && file.branch_policy.is_none() {
            return Err(invalid(
                "automerge protocol needs a branch-policy to wait for",
            ));
        }

        let files_root = path.join(FILES_DIR);
        let mut files = Vec::new();
        if files_root.is_dir() {
            collect_files(&files_root, &files_root, &mut files)?;
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        if files.is_empty() && file.branch_policy.is_none() && !file.code_owners {
            return Err(invalid("scenario seeds no files"));
        }

        Ok(Self {
            id: id.to_string(),
            name: file.name,
            description: file.description,
            branch_policy: file.branch_policy,
            code_owners: file.code_owners,
            protocol: file.protocol,
            expected_pull_requests: file.expected_pull_requests,
            expected_commits: file.expected_commits,
            files,
        })
    }
}

fn collect_files(root: &Path, current: &Path, files: &mut Vec<SeedFile>) -> Result<(), ConfigError> {
    let entries = std::fs::read_dir(current).map_err(|e| ConfigError::IoError {
        path: current.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::IoError {
            path: current.display().to_string(),
            source: e,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_files(root, &path, files)?;
            continue;
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(SeedFile {
            path: relative,
            content,
        });
    }

    Ok(())
}

/// Finds every folder under `root` holding a `scenario.toml`.
///
/// Scenarios that fail to load are logged and skipped. The result is sorted
/// by id so runs are reproducible.
///
/// # Errors
///
/// Returns an error if `root` does not exist or cannot be read.
pub fn scan_scenarios(root: &Path) -> Result<Vec<ScenarioDefinition>, ConfigError> {
    info!(path = %root.display(), "Scanning scenarios directory");

    if !root.exists() {
        return Err(ConfigError::MissingFile {
            path: root.display().to_string(),
        });
    }

    let mut scenarios = Vec::new();
    scan_directory(root, root, &mut scenarios)?;
    scenarios.sort_by(|a, b| a.id.cmp(&b.id));

    info!(count = scenarios.len(), "Loaded scenarios");
    Ok(scenarios)
}

fn scan_directory(
    root: &Path,
    current: &Path,
    scenarios: &mut Vec<ScenarioDefinition>,
) -> Result<(), ConfigError> {
    let entries = std::fs::read_dir(current).map_err(|e| ConfigError::IoError {
        path: current.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::IoError {
            path: current.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if path.join(DEFINITION_FILE).exists() {
            let id = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .to_string();

            match ScenarioDefinition::load(&path, &id) {
                Ok(scenario) => {
                    debug!(id, "Loaded scenario");
                    scenarios.push(scenario);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load scenario");
                }
            }
        } else {
            scan_directory(root, &path, scenarios)?;
        }
    }

    Ok(())
}
