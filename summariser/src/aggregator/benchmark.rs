use wafl_summary_model::{DelayRecord, PerPolicy, Policy, PolicyPerformance, RunTiming, SuiteRow};

use super::scenario::ScenarioSample;

/// Result of summarising one benchmark suite.
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteOutcome {
    Summary(SuiteRow),
    /// No scenario had all three policies; the suite has nothing to report.
    NoCompleteScenarios,
}

/// Averages the scenarios of a benchmark suite into a single row.
pub struct BenchmarkAggregator;

impl BenchmarkAggregator {
    /// Field-wise mean over the complete scenarios. Incomplete scenarios are skipped, not zero
    /// filled.
    pub fn summarize(benchmark: &str, scenarios: &[ScenarioSample]) -> SuiteOutcome {
        let complete = scenarios
            .iter()
            .filter_map(ScenarioSample::complete)
            .collect::<Vec<_>>();
        log::debug!(
            "{benchmark}: {} of {} scenarios complete",
            complete.len(),
            scenarios.len()
        );

        if complete.is_empty() {
            return SuiteOutcome::NoCompleteScenarios;
        }

        SuiteOutcome::Summary(SuiteRow {
            benchmark: benchmark.to_string(),
            scenarios: complete.len(),
            timing: PerPolicy::from_fn(|policy| mean_timing(&complete, policy)),
            delays: PerPolicy::from_fn(|policy| mean_delays(&complete, policy)),
        })
    }
}

fn mean_timing(scenarios: &[&PerPolicy<PolicyPerformance>], policy: Policy) -> RunTiming {
    let n = scenarios.len() as f64;
    let (first, second) = scenarios
        .iter()
        .map(|scenario| scenario.get(policy).timing)
        .fold((0.0, 0.0), |(first, second), timing| {
            (first + timing.first_run_secs, second + timing.second_run_secs)
        });
    RunTiming::new(first / n, second / n)
}

fn mean_delays(scenarios: &[&PerPolicy<PolicyPerformance>], policy: Policy) -> DelayRecord {
    let n = scenarios.len() as u64;
    let (count, amount) = scenarios
        .iter()
        .map(|scenario| scenario.get(policy).delays)
        .fold((0, 0), |(count, amount), delays| {
            (count + delays.delay_count, amount + delays.total_delay_ms)
        });
    DelayRecord {
        delay_count: count / n,
        total_delay_ms: amount / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(first: f64, second: f64, count: u64, amount: u64) -> ScenarioSample {
        ScenarioSample::Complete(PerPolicy::from_fn(|policy| PolicyPerformance {
            timing: RunTiming::new(first, second),
            delays: if policy.is_injected() {
                DelayRecord {
                    delay_count: count,
                    total_delay_ms: amount,
                }
            } else {
                DelayRecord::unavailable()
            },
        }))
    }

    #[test]
    fn averages_only_complete_scenarios() {
        let scenarios = vec![
            sample(1.0, 2.0, 10, 100),
            sample(3.0, 4.0, 30, 300),
            ScenarioSample::Incomplete {
                missing: vec![Policy::WaflBasic],
            },
        ];

        let SuiteOutcome::Summary(row) = BenchmarkAggregator::summarize("netmq", &scenarios) else {
            panic!("Expected a summary");
        };
        assert_eq!(row.benchmark, "netmq");
        assert_eq!(row.scenarios, 2);
        assert_eq!(row.timing.original, RunTiming::new(2.0, 3.0));
        assert_eq!(row.timing.wafl_basic, RunTiming::new(2.0, 3.0));
        assert_eq!(
            row.delays.wafl,
            DelayRecord {
                delay_count: 20,
                total_delay_ms: 200
            }
        );
        assert!(!row.delays.original.is_available());
    }

    #[test]
    fn no_complete_scenarios() {
        let scenarios = vec![ScenarioSample::Incomplete {
            missing: vec![Policy::Original, Policy::Wafl],
        }];
        assert_eq!(
            BenchmarkAggregator::summarize("kubernetes", &scenarios),
            SuiteOutcome::NoCompleteScenarios
        );
        assert_eq!(
            BenchmarkAggregator::summarize("kubernetes", &[]),
            SuiteOutcome::NoCompleteScenarios
        );
    }
}
