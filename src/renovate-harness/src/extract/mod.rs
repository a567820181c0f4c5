//! Reduction of remote pull requests and commits to canonical records.
//!
//! The records are what snapshots compare, so everything order-dependent
//! (labels, table rows, pull request listing order) is sorted here.

mod error;
mod markdown;

pub use error::ExtractionError;
pub use markdown::{first_table, strip_source_marker, MarkdownTable};

use crate::github::{RemoteCommit, RemotePullRequest};
use serde::Serialize;
use std::collections::BTreeSet;

/// Canonical form of one open pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullRequestInfo {
    pub title: String,
    pub labels: BTreeSet<String>,
    /// Sorted by package, then type, then update.
    pub package_updates: Vec<PackageUpdateInfo>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_auto_merge_enabled: bool,
}

/// One row of a pull request's update table.
///
/// Field order defines the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageUpdateInfo {
    pub package: String,
    #[serde(rename = "Type")]
    pub dependency_type: String,
    pub update: String,
}

/// Summary line of one commit on the default branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitInfo {
    pub message: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Extracts the canonical record from one pull request.
///
/// The first table of the body is the update table; its header row is
/// skipped and every other row must have at least package, type and update
/// cells.
///
/// # Errors
///
/// Returns [`ExtractionError`] if the body has no table or a row is short.
pub fn extract_pull_request(pull: &RemotePullRequest) -> Result<PullRequestInfo, ExtractionError> {
    let table = first_table(pull.body.as_deref().unwrap_or_default()).ok_or_else(|| {
        ExtractionError::MissingTable {
            title: pull.title.clone(),
        }
    })?;

    let mut package_updates = table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| match row.as_slice() {
            [package, dependency_type, update, ..] => Ok(PackageUpdateInfo {
                package: strip_source_marker(package),
                dependency_type: dependency_type.trim().to_string(),
                update: update.trim().to_string(),
            }),
            _ => Err(ExtractionError::MalformedRow {
                title: pull.title.clone(),
                row: index + 1,
                cells: row.len(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    package_updates.sort();

    Ok(PullRequestInfo {
        title: pull.title.clone(),
        labels: pull.labels.iter().cloned().collect(),
        package_updates,
        is_auto_merge_enabled: pull.auto_merge_enabled,
    })
}

/// Extracts every pull request, ordered by title.
///
/// # Errors
///
/// Fails on the first pull request that cannot be extracted.
pub fn extract_pull_requests(
    pulls: &[RemotePullRequest],
) -> Result<Vec<PullRequestInfo>, ExtractionError> {
    let mut infos = pulls
        .iter()
        .map(extract_pull_request)
        .collect::<Result<Vec<_>, _>>()?;
    infos.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(infos)
}

/// Reduces commits to their summary lines, keeping the remote's order.
#[must_use]
pub fn extract_commits(commits: &[RemoteCommit]) -> Vec<CommitInfo> {
    commits
        .iter()
        .map(|commit| CommitInfo {
            message: commit.message.lines().next().unwrap_or_default().trim_end().to_string(),
        })
        .collect()
}
