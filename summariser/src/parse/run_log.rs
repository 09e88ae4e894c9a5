//! Parsers for the `Wafl.log` written by the test harness.
//!
//! A log is a sequence of runs, each introduced by `@Run # <n>` and closed by the test runner's
//! `Total time: <x> Seconds` line:
//!
//! ```text
//! @Run # 1
//! ...
//! Test Run Successful.
//! Total tests: 1
//!      Passed: 1
//!  Total time: 2.4711 Seconds
//! ```

use wafl_summary_model::{Policy, RunRecord, RunTiming, TriggeringRun};

use super::line::{run_log_lines, tokenize_run_log, RunLogLine, TOTAL_TIME};
use super::LogParseError;

/// Parse a trial log according to the policy that produced it.
///
/// The baseline never crashes and is read in success mode, injected policies in failure mode.
pub fn parse_run_log(text: &str, policy: Policy) -> Result<RunRecord, LogParseError> {
    match policy {
        Policy::Original => parse_success_log(text),
        Policy::Wafl | Policy::WaflBasic => parse_failure_log(text, policy),
    }
}

/// Average duration over every run in the log.
pub fn parse_success_log(text: &str) -> Result<RunRecord, LogParseError> {
    let durations = total_times(&tokenize_run_log(text)?);
    if durations.is_empty() {
        return Err(LogParseError::MissingMarker { marker: TOTAL_TIME });
    }

    let average = durations.iter().sum::<f64>() / durations.len() as f64;
    Ok(RunRecord::success(average))
}

/// Run in which a crash first appeared, plus preparation and failing run durations.
///
/// Both passes stop as soon as they have what they need, so lines past that point are never
/// parsed and cannot fail the log.
pub fn parse_failure_log(text: &str, policy: Policy) -> Result<RunRecord, LogParseError> {
    let (triggering_run, failure_secs) = match scan_for_trigger(text)? {
        TriggerScan::Scanning => return Ok(RunRecord::unavailable()),
        TriggerScan::Triggered { run } => (run, None),
        TriggerScan::Done { run, failure_secs } => (run, Some(failure_secs)),
    };

    let preparation_secs = match preparation_run(policy, triggering_run) {
        Some(run) => preparation_time(text, run)?,
        None => None,
    };

    let combined = match (preparation_secs, failure_secs) {
        (Some(prep), Some(failure)) if prep > 0.0 && failure > 0.0 => prep + failure,
        _ => {
            log::debug!(
                "Run {triggering_run} crashed but timing is incomplete (preparation {preparation_secs:?}, failure {failure_secs:?})"
            );
            0.0
        }
    };

    Ok(RunRecord::failure(
        TriggeringRun::Observed(triggering_run),
        combined,
    ))
}

/// First and second run durations of a performance trial.
///
/// Anything other than exactly two runs yields an unavailable timing.
pub fn parse_timing_log(text: &str) -> Result<RunTiming, LogParseError> {
    match total_times(&tokenize_run_log(text)?).as_slice() {
        [first, second] => Ok(RunTiming::new(*first, *second)),
        other => {
            log::debug!("Expected two timed runs, found {}", other.len());
            Ok(RunTiming::unavailable())
        }
    }
}

fn total_times(lines: &[RunLogLine]) -> Vec<f64> {
    lines
        .iter()
        .filter_map(|line| match line {
            RunLogLine::TotalTime { seconds } => Some(*seconds),
            _ => None,
        })
        .collect()
}

/// Progress of the forward scan for the first crash.
#[derive(Debug, Clone, Copy, PartialEq)]
enum TriggerScan {
    /// No crash seen yet
    Scanning,
    /// Crash seen in `run`, its duration not yet read
    Triggered { run: u32 },
    /// Crash seen in `run`, which took `failure_secs`
    Done { run: u32, failure_secs: f64 },
}

/// First pass: find the run of the first crash signature and the duration of that run.
///
/// Signatures after the first are ignored. The failing run's duration is the next `Total time`
/// line; if another run starts first the duration stays unknown. Output before the first run
/// header belongs to run 1.
fn scan_for_trigger(text: &str) -> Result<TriggerScan, LogParseError> {
    let mut current_run = 1;
    let mut state = TriggerScan::Scanning;

    for line in run_log_lines(text) {
        state = match (state, line?) {
            (TriggerScan::Scanning, RunLogLine::RunHeader { run }) => {
                current_run = run;
                state
            }
            (TriggerScan::Scanning, RunLogLine::CrashSignature) => {
                TriggerScan::Triggered { run: current_run }
            }
            (TriggerScan::Triggered { .. }, RunLogLine::RunHeader { .. }) => break,
            (TriggerScan::Triggered { run }, RunLogLine::TotalTime { seconds }) => {
                TriggerScan::Done {
                    run,
                    failure_secs: seconds,
                }
            }
            _ => state,
        };
        if let TriggerScan::Done { .. } = state {
            break;
        }
    }

    Ok(state)
}

/// Run whose duration counts as preparation for the triggering run.
fn preparation_run(policy: Policy, triggering_run: u32) -> Option<u32> {
    match policy {
        Policy::Original => None,
        Policy::Wafl => Some(1),
        Policy::WaflBasic => triggering_run.checked_sub(1).filter(|run| *run > 0),
    }
}

/// Second pass: durations accumulated from the start of the log up to and including `target`.
///
/// [None] if the log has no run `target` or it never completed.
fn preparation_time(text: &str, target: u32) -> Result<Option<f64>, LogParseError> {
    let mut in_target = false;
    let mut accumulated = 0.0;

    for line in run_log_lines(text) {
        match line? {
            RunLogLine::RunHeader { run } if run == target => in_target = true,
            RunLogLine::TotalTime { seconds } => {
                accumulated += seconds;
                if in_target {
                    return Ok(Some(accumulated));
                }
            }
            _ => {}
        }
    }

    Ok(None)
}
