use anyhow::Context;
use wafl_summary_model::{DelayRecord, PolicyPerformance, RunRecord, RunTiming};

use crate::discover::{PolicyDir, TrialDir};
use crate::parse::delay_stats::parse_delay_stats;
use crate::parse::run_log::{parse_run_log, parse_timing_log};
use crate::parse::{read_run_log, read_stats_log};

/// Parse the run log of every trial of a policy for the correctness summary.
///
/// Missing or unreadable logs become [RunRecord::unavailable] so the remaining trials still count.
pub fn correctness_trials(policy_dir: &PolicyDir) -> anyhow::Result<Vec<RunRecord>> {
    Ok(policy_dir
        .trials()?
        .iter()
        .map(|trial| correctness_trial(policy_dir, trial))
        .collect())
}

fn correctness_trial(policy_dir: &PolicyDir, trial: &TrialDir) -> RunRecord {
    let Some(path) = trial.run_log() else {
        log::debug!("No run log in {}", trial.path.display());
        return RunRecord::unavailable();
    };

    match read_run_log(&path).and_then(|text| parse_run_log(&text, policy_dir.policy)) {
        Ok(record) => {
            log::debug!("{}: {record:?}", path.display());
            record
        }
        Err(e) => {
            log::warn!("Ignoring {}: {e}", path.display());
            RunRecord::unavailable()
        }
    }
}

/// Read the timing and delay statistics of every trial of a policy for the performance summary.
pub fn performance_trials(policy_dir: &PolicyDir) -> anyhow::Result<Vec<PolicyPerformance>> {
    policy_dir
        .trials()?
        .iter()
        .map(performance_trial)
        .collect()
}

fn performance_trial(trial: &TrialDir) -> anyhow::Result<PolicyPerformance> {
    let timing = match trial.run_log() {
        Some(path) => match read_run_log(&path).and_then(|text| parse_timing_log(&text)) {
            Ok(timing) => timing,
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.display());
                RunTiming::unavailable()
            }
        },
        None => {
            log::debug!("No run log in {}", trial.path.display());
            RunTiming::unavailable()
        }
    };

    let stats_logs = trial
        .stats_logs()
        .with_context(|| format!("Listing delay stats in {}", trial.path.display()))?;
    let delays = stats_logs
        .iter()
        .map(|path| {
            read_stats_log(path)
                .and_then(|text| parse_delay_stats(&text))
                .unwrap_or_else(|e| {
                    log::warn!("Ignoring {}: {e}", path.display());
                    DelayRecord::unavailable()
                })
        })
        .fold(DelayRecord::unavailable(), |total, delays| DelayRecord {
            delay_count: total.delay_count + delays.delay_count,
            total_delay_ms: total.total_delay_ms + delays.total_delay_ms,
        });

    Ok(PolicyPerformance { timing, delays })
}
