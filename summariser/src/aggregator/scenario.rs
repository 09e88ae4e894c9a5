use wafl_summary_model::{PerPolicy, Policy, PolicyPerformance, RunRecord, ScenarioId, ScenarioRow};

/// Combines the representative record of each policy into one row per scenario.
pub struct ScenarioAggregator;

impl ScenarioAggregator {
    /// Build the correctness row for a scenario from its reduced per-policy records.
    pub fn compare(scenario: ScenarioId, reduced: &PerPolicy<RunRecord>) -> ScenarioRow {
        let time_baseline_secs = reduced.original.raw_duration_secs();
        let time_basic_secs = reduced.wafl_basic.raw_duration_secs();
        let time_full_secs = reduced.wafl.raw_duration_secs();

        ScenarioRow {
            scenario,
            attempts_basic: reduced.wafl_basic.triggering_run(),
            attempts_full: reduced.wafl.triggering_run(),
            time_baseline_secs,
            time_basic_secs,
            time_full_secs,
            slowdown_basic: slowdown(time_basic_secs, time_baseline_secs),
            slowdown_full: slowdown(time_full_secs, time_baseline_secs),
        }
    }
}

/// Ratio of an injected policy's time to the baseline time.
///
/// [None] unless both were measured, so an unavailable input never shows up as `0` or `inf`.
pub fn slowdown(policy_secs: f64, baseline_secs: f64) -> Option<f64> {
    (policy_secs > 0.0 && baseline_secs > 0.0).then(|| policy_secs / baseline_secs)
}

/// Performance measurements of one scenario.
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioSample {
    /// Every policy directory was present.
    Complete(PerPolicy<PolicyPerformance>),
    /// Some policies were never run; the scenario is left out of suite averages.
    Incomplete { missing: Vec<Policy> },
}

impl ScenarioSample {
    pub fn complete(&self) -> Option<&PerPolicy<PolicyPerformance>> {
        match self {
            ScenarioSample::Complete(per_policy) => Some(per_policy),
            ScenarioSample::Incomplete { .. } => None,
        }
    }
}
