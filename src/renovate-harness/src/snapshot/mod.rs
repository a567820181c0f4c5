//! Inline snapshot validation.
//!
//! A value is rendered as YAML, scrubbed of version numbers and compared
//! with an expected literal written next to the assertion. An empty literal
//! switches to authoring mode: the captured text is logged so it can be
//! pasted in, and the check passes.

mod error;
mod scrub;

pub use error::SnapshotError;
pub use scrub::{Scrubber, REDACTED_VERSION};

use serde::Serialize;
use similar::TextDiff;
use std::fmt;
use std::panic::Location;
use std::sync::OnceLock;
use tracing::{debug, warn};

static SCRUBBER: OnceLock<Result<Scrubber, regex::Error>> = OnceLock::new();

/// Shared scrubber, compiled on first use.
fn scrubber() -> Result<&'static Scrubber, SnapshotError> {
    SCRUBBER
        .get_or_init(Scrubber::new)
        .as_ref()
        .map_err(|e| SnapshotError::Pattern(e.clone()))
}

/// Result of a snapshot check that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The captured text equals the expected literal.
    Matched,

    /// No expectation was given; this is the captured text to store.
    Recorded { snapshot: String },
}

/// Renders `value` as canonical YAML.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String, SnapshotError> {
    Ok(serde_yaml::to_string(value)?)
}

/// Drops common indentation, trailing whitespace and blank edge lines, so
/// literals can be indented along with the code around them.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    let Some(start) = lines.iter().position(|line| !line.is_empty()) else {
        return String::new();
    };
    let end = lines
        .iter()
        .rposition(|line| !line.is_empty())
        .unwrap_or(start);
    let body = &lines[start..=end];

    let indent = body
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Canonical, scrubbed and normalized snapshot text for `value`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn snapshot_text<T: Serialize + ?Sized>(value: &T) -> Result<String, SnapshotError> {
    Ok(normalize(&scrubber()?.scrub(&canonicalize(value)?)))
}

/// Compares `actual` with `expected`, reporting the caller's location on
/// mismatch.
///
/// # Errors
///
/// Returns [`SnapshotError::Mismatch`] with a unified diff when the texts
/// differ.
#[track_caller]
pub fn validate<T: Serialize + ?Sized>(
    actual: &T,
    expected: Option<&str>,
) -> Result<SnapshotOutcome, SnapshotError> {
    validate_at(actual, expected, Location::caller())
}

/// [`validate`] with an explicit location, such as a call site or the
/// definition file a declarative expectation came from.
///
/// # Errors
///
/// Same as [`validate`].
pub fn validate_at<T: Serialize + ?Sized>(
    actual: &T,
    expected: Option<&str>,
    location: &dyn fmt::Display,
) -> Result<SnapshotOutcome, SnapshotError> {
    let actual = snapshot_text(actual)?;

    let expected = match expected.map(normalize) {
        Some(expected) if !expected.is_empty() => expected,
        _ => {
            warn!(location = %location, "No expected snapshot, captured:\n{actual}");
            return Ok(SnapshotOutcome::Recorded { snapshot: actual });
        }
    };

    if actual == expected {
        debug!(location = %location, "Snapshot matched");
        return Ok(SnapshotOutcome::Matched);
    }

    let diff = TextDiff::from_lines(&expected, &actual)
        .unified_diff()
        .context_radius(3)
        .header("expected", "actual")
        .to_string();

    Err(SnapshotError::Mismatch {
        location: location.to_string(),
        expected,
        actual,
        diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{CommitInfo, PackageUpdateInfo, PullRequestInfo};
    use std::collections::BTreeSet;

    fn pin_pull_request() -> PullRequestInfo {
        PullRequestInfo {
            title: "fix(deps): pin dependencies".to_string(),
            labels: BTreeSet::from(["renovate".to_string()]),
            package_updates: vec![PackageUpdateInfo {
                package: "react".to_string(),
                dependency_type: "dependencies".to_string(),
                update: "pin".to_string(),
            }],
            is_auto_merge_enabled: false,
        }
    }

    #[test]
    fn scrubber_is_compiled_once() {
        let first = scrubber().unwrap();
        let second = scrubber().unwrap();

        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn empty_list_is_brackets() {
        let pulls: Vec<PullRequestInfo> = Vec::new();

        assert_eq!(
            validate(&pulls, Some("[]")).unwrap(),
            SnapshotOutcome::Matched
        );
    }

    #[test]
    fn matches_indented_literal() {
        let outcome = validate(
            &[pin_pull_request()],
            Some(
                "
                - Title: 'fix(deps): pin dependencies'
                  Labels:
                  - renovate
                  PackageUpdates:
                  - Package: react
                    Type: dependencies
                    Update: pin
                ",
            ),
        )
        .unwrap();

        assert_eq!(outcome, SnapshotOutcome::Matched);
    }

    #[test]
    fn auto_merge_flag_only_appears_when_set() {
        let mut pull = pin_pull_request();
        assert!(!snapshot_text(&pull).unwrap().contains("IsAutoMergeEnabled"));

        pull.is_auto_merge_enabled = true;
        assert!(snapshot_text(&pull)
            .unwrap()
            .lines()
            .any(|line| line == "IsAutoMergeEnabled: true"));
    }

    #[test]
    fn versions_are_scrubbed_before_comparison() {
        let commits = vec![CommitInfo {
            message: "chore(deps): update mongodb monorepo to v2.28.0".to_string(),
        }];

        let outcome = validate(
            &commits,
            Some("- Message: 'chore(deps): update mongodb monorepo to redacted'"),
        )
        .unwrap();

        assert_eq!(outcome, SnapshotOutcome::Matched);
    }

    #[test]
    fn mismatch_reports_diff_and_location() {
        let commits = vec![CommitInfo {
            message: "IDP ScaffoldIt automated test".to_string(),
        }];

        let error = validate(&commits, Some("- Message: something else")).unwrap_err();

        match error {
            SnapshotError::Mismatch {
                location, diff, ..
            } => {
                assert!(location.contains("snapshot"), "location was {location}");
                assert!(diff.contains("-- Message: something else"));
                assert!(diff.contains("+- Message: IDP ScaffoldIt automated test"));
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn missing_expectation_records() {
        let commits = vec![CommitInfo {
            message: "IDP ScaffoldIt automated test".to_string(),
        }];

        for expected in [None, Some(""), Some("   \n  ")] {
            let outcome = validate(&commits, expected).unwrap();
            assert_eq!(
                outcome,
                SnapshotOutcome::Recorded {
                    snapshot: "- Message: IDP ScaffoldIt automated test".to_string()
                }
            );
        }
    }

    #[test]
    fn normalize_dedents_and_trims() {
        assert_eq!(normalize("\n    a:\n      - b   \n\n    c\n  "), "a:\n  - b\n\nc");
        assert_eq!(normalize("  \n \n"), "");
    }
}
