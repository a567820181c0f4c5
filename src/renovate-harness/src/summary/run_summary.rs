//! Run summary types.

use super::outcome::ScenarioOutcome;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of scenarios selected for the run.
    pub scenarios_selected: usize,

    /// Number of scenarios whose expectations all matched.
    pub passed: usize,

    /// Number of scenarios that recorded snapshots.
    pub recorded: usize,

    /// Number of scenarios that failed.
    pub failed: usize,

    /// Number of selected scenarios never started because an earlier one failed.
    pub skipped: usize,

    /// Outcomes in execution order.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl RunSummary {
    /// Creates an empty summary for `scenarios_selected` scenarios.
    #[must_use]
    pub fn new(scenarios_selected: usize) -> Self {
        Self {
            scenarios_selected,
            ..Default::default()
        }
    }

    /// Updates the summary with a scenario outcome.
    pub fn record_outcome(&mut self, outcome: ScenarioOutcome) {
        match &outcome {
            ScenarioOutcome::Passed { .. } => self.passed += 1,
            ScenarioOutcome::Recorded { .. } => self.recorded += 1,
            ScenarioOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// Marks the scenarios that were not reached.
    pub fn finish(&mut self) {
        self.skipped = self.scenarios_selected.saturating_sub(self.outcomes.len());
    }

    /// Returns true if any scenario failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Returns true if every selected scenario ran and none failed.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}
