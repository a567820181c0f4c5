#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod checks;
pub mod cleanup;
pub mod config;
pub mod credentials;
pub mod extract;
pub mod git;
pub mod github;
pub mod process;
pub mod rate_limit;
pub mod renovate;
pub mod runner;
pub mod scenario;
pub mod seeds;
pub mod snapshot;
pub mod summary;
pub mod workspace;

pub use checks::{wait_for_checks_to_settle, ChecksError, WaitOptions};
pub use cleanup::{reset_non_default_branches, CleanupReport};
pub use config::{
    find_git_root, load_config, load_config_or_default, resolve_renovate_config, ConfigError,
    HarnessConfig,
};
pub use credentials::{resolve_token, token_from_env, Token, DEFAULT_TOKEN_ENV};
pub use extract::{
    extract_commits, extract_pull_request, extract_pull_requests, CommitInfo, ExtractionError,
    PackageUpdateInfo, PullRequestInfo,
};
pub use github::{
    BranchDeletion, CheckState, GitHubClient, RemoteBranch, RemoteCommit, RemoteError,
    RemotePullRequest, RemoteRepository, RepositoryId,
};
pub use process::{run_command, CommandOutput, CommandSpec, ProcessError};
pub use renovate::{run_renovate, RenovateRun};
pub use runner::{InspectReport, Runner, RunnerConfig, RunnerError};
pub use scenario::{
    scan_scenarios, BranchCheck, RunProtocol, Scenario, ScenarioDefinition, ScenarioError,
    SeedFile,
};
pub use seeds::{BranchPolicyOutcome, SeedError, SeedRenderer};
pub use snapshot::{snapshot_text, validate, SnapshotError, SnapshotOutcome};
pub use summary::{RecordedSnapshot, RunSummary, ScenarioOutcome, SnapshotKind};
pub use workspace::{ScratchWorkspace, WorkspaceError};
