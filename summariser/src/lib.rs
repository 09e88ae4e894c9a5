use anyhow::Context;
use std::path::Path;
use wafl_summary_model::{
    CorrectnessReport, Mode, PerPolicy, PerformanceReport, Policy, PolicyPerformance, RunRecord,
};

use crate::aggregator::{
    BenchmarkAggregator, MissingTrials, ScenarioAggregator, ScenarioSample, SuiteOutcome,
    TrialAggregator,
};
use crate::discover::{ResultsTree, ScenarioDir};

pub mod aggregator;
pub mod catalogue;
mod collect;
pub mod discover;
pub mod parse;
pub mod table;

/// Summarise `<root>/Results/correctness` into one row per scenario.
///
/// Each policy is reduced to the median of its trials, then the policies of a scenario are
/// compared against the baseline.
pub fn summarize_correctness(root: &Path) -> anyhow::Result<CorrectnessReport> {
    let tree = ResultsTree::open(root, Mode::Correctness)?;
    let trials = TrialAggregator::default();
    let mut report = CorrectnessReport::default();

    for benchmark in tree.benchmarks()? {
        let scenarios = benchmark
            .scenarios()
            .with_context(|| format!("Listing scenarios of {}", benchmark.name))?;

        for scenario in scenarios {
            let mut reduced = PerPolicy::from_fn(|_| RunRecord::unavailable());
            for policy in Policy::ALL {
                match scenario.policy(policy) {
                    Some(policy_dir) => {
                        let records = collect::correctness_trials(&policy_dir)
                            .with_context(|| format!("Collecting {policy} trials of {}", scenario.id))?;
                        *reduced.get_mut(policy) = trials.median(records);
                    }
                    None => log::debug!("{} has no {policy} trials", scenario.id),
                }
            }

            let row = ScenarioAggregator::compare(scenario.id.clone(), &reduced);
            log::debug!("{row:?}");
            report.rows.insert(scenario.id.to_string(), row);
        }
    }

    Ok(report)
}

/// Summarise `<root>/Results/performance` into one row per benchmark suite.
///
/// Suites without a single complete scenario are listed in
/// [PerformanceReport::empty_suites] and otherwise left out.
pub fn summarize_performance(
    root: &Path,
    missing_trials: MissingTrials,
) -> anyhow::Result<PerformanceReport> {
    let tree = ResultsTree::open(root, Mode::Performance)?;
    let trials = TrialAggregator::new(missing_trials);
    let mut report = PerformanceReport::default();

    for benchmark in tree.benchmarks()? {
        let samples = benchmark
            .scenarios()
            .with_context(|| format!("Listing scenarios of {}", benchmark.name))?
            .iter()
            .map(|scenario| performance_sample(scenario, &trials))
            .collect::<anyhow::Result<Vec<_>>>()?;

        match BenchmarkAggregator::summarize(&benchmark.name, &samples) {
            SuiteOutcome::Summary(row) => {
                report.suites.insert(benchmark.name.clone(), row);
            }
            SuiteOutcome::NoCompleteScenarios => {
                log::warn!("No data compiled for {}", benchmark.name);
                report.empty_suites.push(benchmark.name.clone());
            }
        }
    }

    Ok(report)
}

fn performance_sample(
    scenario: &ScenarioDir,
    trials: &TrialAggregator,
) -> anyhow::Result<ScenarioSample> {
    let missing = scenario.missing_policies();
    if !missing.is_empty() {
        log::info!("Skipping incomplete scenario {} (missing {missing:?})", scenario.id);
        return Ok(ScenarioSample::Incomplete { missing });
    }

    let mut per_policy = PerPolicy::<PolicyPerformance>::default();
    for policy in Policy::ALL {
        let Some(policy_dir) = scenario.policy(policy) else {
            return Ok(ScenarioSample::Incomplete {
                missing: vec![policy],
            });
        };
        let samples = collect::performance_trials(&policy_dir)
            .with_context(|| format!("Collecting {policy} trials of {}", scenario.id))?;
        *per_policy.get_mut(policy) = trials.mean(&samples);
    }

    Ok(ScenarioSample::Complete(per_policy))
}
