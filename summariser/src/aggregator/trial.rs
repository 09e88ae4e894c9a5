use wafl_summary_model::{DelayRecord, PolicyPerformance, RunRecord, RunTiming};

/// How performance means treat trials whose logs were missing or unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTrials {
    /// The trial contributes zeros and still counts in the denominator.
    #[default]
    CountAsZero,
    /// The trial is left out of the mean for the fields it has no value for.
    Exclude,
}

/// Reduces the repeated trials of one `(scenario, policy)` pair to a single representative record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialAggregator {
    missing_trials: MissingTrials,
}

impl TrialAggregator {
    pub fn new(missing_trials: MissingTrials) -> Self {
        Self { missing_trials }
    }

    /// Lower median by `(triggering run, duration)`.
    ///
    /// One trial that never triggers within its time budget does not drag the result the way a
    /// mean would. No trials at all gives [RunRecord::unavailable].
    pub fn median(&self, mut records: Vec<RunRecord>) -> RunRecord {
        if records.is_empty() {
            return RunRecord::unavailable();
        }
        records.sort_by(RunRecord::rank_cmp);
        records[(records.len() - 1) / 2]
    }

    /// Field-wise arithmetic mean of the trials' timing and delay statistics.
    pub fn mean(&self, trials: &[PolicyPerformance]) -> PolicyPerformance {
        PolicyPerformance {
            timing: self.mean_timing(trials.iter().map(|trial| trial.timing)),
            delays: self.mean_delays(trials.iter().map(|trial| trial.delays)),
        }
    }

    fn mean_timing(&self, timings: impl Iterator<Item = RunTiming>) -> RunTiming {
        let timings = timings
            .filter(|timing| self.counts(timing.is_available()))
            .collect::<Vec<_>>();
        if timings.is_empty() {
            return RunTiming::unavailable();
        }

        let n = timings.len() as f64;
        RunTiming::new(
            timings.iter().map(|t| t.first_run_secs).sum::<f64>() / n,
            timings.iter().map(|t| t.second_run_secs).sum::<f64>() / n,
        )
    }

    fn mean_delays(&self, delays: impl Iterator<Item = DelayRecord>) -> DelayRecord {
        let delays = delays
            .filter(|delay| self.counts(delay.is_available()))
            .collect::<Vec<_>>();
        if delays.is_empty() {
            return DelayRecord::unavailable();
        }

        let n = delays.len() as u64;
        DelayRecord {
            delay_count: delays.iter().map(|d| d.delay_count).sum::<u64>() / n,
            total_delay_ms: delays.iter().map(|d| d.total_delay_ms).sum::<u64>() / n,
        }
    }

    fn counts(&self, has_value: bool) -> bool {
        match self.missing_trials {
            MissingTrials::CountAsZero => true,
            MissingTrials::Exclude => has_value,
        }
    }
}
