//! Per-scenario outcomes.

/// Which assertion a recorded snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotKind {
    PullRequests,
    Commits,
}

impl SnapshotKind {
    /// Key to paste the snapshot under in `scenario.toml`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PullRequests => "expected-pull-requests",
            Self::Commits => "expected-commits",
        }
    }
}

/// Snapshot captured because the scenario had no expectation for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSnapshot {
    pub kind: SnapshotKind,
    pub text: String,
}

/// Result of running one scenario.
#[derive(Debug, Clone)]
pub enum ScenarioOutcome {
    /// Every expectation matched.
    Passed {
        /// Scenario id.
        id: String,
    },

    /// Nothing failed, but at least one snapshot was recorded instead of
    /// compared.
    Recorded {
        /// Scenario id.
        id: String,
        /// Captured snapshots.
        snapshots: Vec<RecordedSnapshot>,
    },

    /// A step or an assertion failed.
    Failed {
        /// Scenario id.
        id: String,
        /// Error message.
        error: String,
    },
}

impl ScenarioOutcome {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Passed { id } | Self::Recorded { id, .. } | Self::Failed { id, .. } => id,
        }
    }
}
