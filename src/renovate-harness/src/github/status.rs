//! Check state reported for a commit.

use serde::Deserialize;

/// Aggregate of every check run and commit status attached to a ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Nothing reported yet, or at least one check still running.
    Pending,

    /// Every check completed successfully.
    Success,

    /// At least one check completed unsuccessfully.
    Failure,
}

impl CheckState {
    /// Returns the state as a string for logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CheckRunList {
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CheckRun {
    pub name: String,
    pub status: String,
    pub conclusion: Option<String>,
}

/// `GET /repos/{owner}/{repo}/commits/{ref}/status`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CombinedStatus {
    #[serde(default)]
    pub statuses: Vec<CommitStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitStatus {
    pub context: String,
    pub state: String,
}

/// Folds check runs and legacy commit statuses into one [`CheckState`].
///
/// A ref with nothing reported counts as pending: the CI system may simply
/// not have picked the push up yet.
pub(crate) fn reduce_check_state(runs: &[CheckRun], statuses: &[CommitStatus]) -> CheckState {
    if runs.is_empty() && statuses.is_empty() {
        return CheckState::Pending;
    }

    let mut state = CheckState::Success;

    for run in runs {
        if run.status != "completed" {
            return CheckState::Pending;
        }
        let succeeded = matches!(
            run.conclusion.as_deref(),
            Some("success" | "neutral" | "skipped")
        );
        if !succeeded {
            state = CheckState::Failure;
        }
    }

    for status in statuses {
        match status.state.as_str() {
            "pending" => return CheckState::Pending,
            "success" => {}
            _ => state = CheckState::Failure,
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(status: &str, conclusion: Option<&str>) -> CheckRun {
        CheckRun {
            name: "branch-policy".to_string(),
            status: status.to_string(),
            conclusion: conclusion.map(str::to_string),
        }
    }

    fn status(state: &str) -> CommitStatus {
        CommitStatus {
            context: "ci".to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn nothing_reported_is_pending() {
        assert_eq!(reduce_check_state(&[], &[]), CheckState::Pending);
    }

    #[test]
    fn running_check_is_pending() {
        let runs = [run("completed", Some("success")), run("in_progress", None)];
        assert_eq!(reduce_check_state(&runs, &[]), CheckState::Pending);
    }

    #[test]
    fn failed_conclusion_wins_over_success() {
        let runs = [run("completed", Some("success")), run("completed", Some("failure"))];
        assert_eq!(reduce_check_state(&runs, &[]), CheckState::Failure);
    }

    #[test]
    fn skipped_and_neutral_count_as_success() {
        let runs = [run("completed", Some("skipped")), run("completed", Some("neutral"))];
        assert_eq!(reduce_check_state(&runs, &[]), CheckState::Success);
    }

    #[test]
    fn pending_commit_status_blocks_settlement() {
        let runs = [run("completed", Some("success"))];
        assert_eq!(
            reduce_check_state(&runs, &[status("pending")]),
            CheckState::Pending
        );
    }

    #[test]
    fn errored_commit_status_is_failure() {
        assert_eq!(
            reduce_check_state(&[], &[status("success"), status("error")]),
            CheckState::Failure
        );
    }
}
