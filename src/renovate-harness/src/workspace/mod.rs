//! Disposable local checkout for a single scenario.

mod error;

pub use error::WorkspaceError;

use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

const WORKSPACE_PREFIX: &str = "renovate-harness-";

/// A uniquely named temporary directory owned by one scenario.
///
/// The directory is deleted when the workspace is dropped, including when the
/// owning scenario fails halfway through. [`ScratchWorkspace::close`] removes
/// it eagerly and reports removal errors instead of ignoring them.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Creates a fresh, empty workspace under the system temp directory.
    pub fn create() -> Result<Self, WorkspaceError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(WorkspaceError::Create)?;
        debug!(path = %dir.path().display(), "Created scratch workspace");
        Ok(Self { dir })
    }

    /// Root of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `relative_path`, creating parent directories.
    pub fn add_file(&self, relative_path: &str, content: &str) -> Result<PathBuf, WorkspaceError> {
        let target = self.resolve(relative_path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|source| WorkspaceError::Write {
                path: relative_path.to_string(),
                source,
            })?;
        }
        std::fs::write(&target, content).map_err(|source| WorkspaceError::Write {
            path: relative_path.to_string(),
            source,
        })?;
        debug!(path = relative_path, bytes = content.len(), "Seeded file");
        Ok(target)
    }

    /// Copies an existing file into the workspace at `relative_path`.
    pub fn copy_file(&self, source: &Path, relative_path: &str) -> Result<PathBuf, WorkspaceError> {
        let target = self.resolve(relative_path)?;
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WorkspaceError::Write {
                path: relative_path.to_string(),
                source: e,
            })?;
        }
        std::fs::copy(source, &target).map_err(|e| WorkspaceError::Write {
            path: relative_path.to_string(),
            source: e,
        })?;
        Ok(target)
    }

    /// Deletes the workspace now.
    pub fn close(self) -> Result<(), WorkspaceError> {
        self.dir.close().map_err(WorkspaceError::Remove)
    }

    fn resolve(&self, relative_path: &str) -> Result<PathBuf, WorkspaceError> {
        let relative = Path::new(relative_path);
        let is_contained = !relative_path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        if !is_contained {
            return Err(WorkspaceError::InvalidPath {
                path: relative_path.to_string(),
            });
        }

        Ok(self.dir.path().join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_nested_files() {
        let workspace = ScratchWorkspace::create().unwrap();

        workspace
            .add_file(".github/workflows/ci.yml", "name: ci")
            .unwrap();

        let written =
            std::fs::read_to_string(workspace.path().join(".github/workflows/ci.yml")).unwrap();
        assert_eq!(written, "name: ci");
    }

    #[test]
    fn rejects_paths_outside_workspace() {
        let workspace = ScratchWorkspace::create().unwrap();

        for path in ["../escape.txt", "/etc/passwd", "nested/../../escape", ""] {
            let result = workspace.add_file(path, "x");
            assert!(
                matches!(result, Err(WorkspaceError::InvalidPath { .. })),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn directory_is_removed_on_drop() {
        let workspace = ScratchWorkspace::create().unwrap();
        let path = workspace.path().to_path_buf();
        assert!(path.exists());

        drop(workspace);

        assert!(!path.exists());
    }

    #[test]
    fn close_removes_directory() {
        let workspace = ScratchWorkspace::create().unwrap();
        let path = workspace.path().to_path_buf();
        workspace.add_file("global.json", "{}").unwrap();

        workspace.close().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn copies_files_in() {
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("default.json");
        std::fs::write(&source, r#"{"extends": []}"#).unwrap();
        let workspace = ScratchWorkspace::create().unwrap();

        workspace.copy_file(&source, "renovate.json").unwrap();

        let copied = std::fs::read_to_string(workspace.path().join("renovate.json")).unwrap();
        assert_eq!(copied, r#"{"extends": []}"#);
    }
}
