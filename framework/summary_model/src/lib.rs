use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

/// Delay injection policy a trial was executed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Un-instrumented baseline
    #[serde(rename = "original")]
    Original,
    /// Full delay injection
    #[serde(rename = "wafl")]
    Wafl,
    /// Reduced delay injection
    #[serde(rename = "waflbasic")]
    WaflBasic,
}

impl Policy {
    /// Every policy, in the order trials are collected.
    pub const ALL: [Policy; 3] = [Policy::Original, Policy::Wafl, Policy::WaflBasic];

    /// Name of the directory that holds this policy's trials.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Policy::Original => "original",
            Policy::Wafl => "wafl",
            Policy::WaflBasic => "waflbasic",
        }
    }

    /// Whether this policy injects delays.
    pub fn is_injected(&self) -> bool {
        !matches!(self, Policy::Original)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One value per [Policy].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPolicy<T> {
    pub original: T,
    pub wafl: T,
    pub wafl_basic: T,
}

impl<T> PerPolicy<T> {
    /// Build by calling `f` once per policy.
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Policy) -> T,
    {
        Self {
            original: f(Policy::Original),
            wafl: f(Policy::Wafl),
            wafl_basic: f(Policy::WaflBasic),
        }
    }

    pub fn get(&self, policy: Policy) -> &T {
        match policy {
            Policy::Original => &self.original,
            Policy::Wafl => &self.wafl,
            Policy::WaflBasic => &self.wafl_basic,
        }
    }

    pub fn get_mut(&mut self, policy: Policy) -> &mut T {
        match policy {
            Policy::Original => &mut self.original,
            Policy::Wafl => &mut self.wafl,
            Policy::WaflBasic => &mut self.wafl_basic,
        }
    }
}

/// Which kind of experiment a results tree holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Bug triggering statistics
    Correctness,
    /// Timing and delay injection statistics
    Performance,
}

impl Mode {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Mode::Correctness => "correctness",
            Mode::Performance => "performance",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A test case known to exhibit a concurrency bug, written `benchmark@test`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioId {
    pub benchmark: String,
    pub test: String,
}

impl ScenarioId {
    pub fn new(benchmark: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            test: test.into(),
        }
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.benchmark, self.test)
    }
}

/// The run in which a crash signature first appeared.
///
/// Orders every observed run before [TriggeringRun::NeverObserved], which behaves as +infinity
/// when trials are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggeringRun {
    /// 1-based run index. Baseline records use `0`.
    Observed(u32),
    NeverObserved,
}

impl TriggeringRun {
    pub fn index(&self) -> Option<u32> {
        match self {
            TriggeringRun::Observed(run) => Some(*run),
            TriggeringRun::NeverObserved => None,
        }
    }
}

/// Parsed outcome of one trial's run log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Baseline trial, every run passed.
    Success { average_duration_secs: f64 },
    /// Injected trial.
    ///
    /// `combined_duration_secs` is the preparation run plus the failing run. It is `0.0` when
    /// either part could not be measured and must then be read as unavailable.
    Failure {
        triggering_run: TriggeringRun,
        combined_duration_secs: f64,
    },
}

/// One parsed outcome for a single trial of a single policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub outcome: RunOutcome,
}

impl RunRecord {
    pub fn success(average_duration_secs: f64) -> Self {
        Self {
            outcome: RunOutcome::Success {
                average_duration_secs,
            },
        }
    }

    pub fn failure(triggering_run: TriggeringRun, combined_duration_secs: f64) -> Self {
        Self {
            outcome: RunOutcome::Failure {
                triggering_run,
                combined_duration_secs,
            },
        }
    }

    /// Record standing in for a missing or unreadable trial, or a policy with no trials.
    pub fn unavailable() -> Self {
        Self::failure(TriggeringRun::NeverObserved, 0.0)
    }

    /// Triggering run, with successful records ranked as run `0`.
    pub fn triggering_run(&self) -> TriggeringRun {
        match self.outcome {
            RunOutcome::Success { .. } => TriggeringRun::Observed(0),
            RunOutcome::Failure { triggering_run, .. } => triggering_run,
        }
    }

    /// Raw duration in seconds, `0.0` when unavailable.
    pub fn raw_duration_secs(&self) -> f64 {
        match self.outcome {
            RunOutcome::Success {
                average_duration_secs,
            } => average_duration_secs,
            RunOutcome::Failure {
                combined_duration_secs,
                ..
            } => combined_duration_secs,
        }
    }

    /// Duration in seconds if it was measured.
    pub fn duration_secs(&self) -> Option<f64> {
        Some(self.raw_duration_secs()).filter(|d| *d > 0.0)
    }

    /// Natural ordering by `(triggering run, duration)`.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.triggering_run()
            .cmp(&other.triggering_run())
            .then_with(|| self.raw_duration_secs().total_cmp(&other.raw_duration_secs()))
    }
}

/// Totals read from a delay-injection stats log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRecord {
    pub delay_count: u64,
    pub total_delay_ms: u64,
}

impl DelayRecord {
    /// Build from raw totals. Non-positive totals make the whole record unavailable.
    pub fn from_totals(delay_count: i64, total_delay_ms: i64) -> Self {
        if delay_count > 0 && total_delay_ms > 0 {
            Self {
                delay_count: delay_count as u64,
                total_delay_ms: total_delay_ms as u64,
            }
        } else {
            Self::unavailable()
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.delay_count > 0 && self.total_delay_ms > 0
    }
}

/// Durations of the first and second run of a performance trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTiming {
    pub first_run_secs: f64,
    pub second_run_secs: f64,
}

impl RunTiming {
    pub fn new(first_run_secs: f64, second_run_secs: f64) -> Self {
        Self {
            first_run_secs,
            second_run_secs,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn is_available(&self) -> bool {
        self.first_run_secs > 0.0 && self.second_run_secs > 0.0
    }
}

/// Mean timing and delay statistics of one policy for one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyPerformance {
    pub timing: RunTiming,
    pub delays: DelayRecord,
}

/// Comparison of the three policies for one scenario in correctness mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub scenario: ScenarioId,
    pub attempts_basic: TriggeringRun,
    pub attempts_full: TriggeringRun,
    /// Seconds, `0.0` when unavailable
    pub time_baseline_secs: f64,
    /// Seconds, `0.0` when unavailable
    pub time_basic_secs: f64,
    /// Seconds, `0.0` when unavailable
    pub time_full_secs: f64,
    /// Basic injection time over baseline time, absent unless both were measured
    pub slowdown_basic: Option<f64>,
    /// Full injection time over baseline time, absent unless both were measured
    pub slowdown_full: Option<f64>,
}

/// Per-benchmark averages over the complete scenarios of a performance run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteRow {
    pub benchmark: String,
    /// Number of scenarios the averages were taken over
    pub scenarios: usize,
    pub timing: PerPolicy<RunTiming>,
    pub delays: PerPolicy<DelayRecord>,
}

/// Correctness results keyed by `benchmark@scenario`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectnessReport {
    pub rows: BTreeMap<String, ScenarioRow>,
}

/// Performance results keyed by benchmark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub suites: BTreeMap<String, SuiteRow>,
    /// Benchmarks that had no complete scenario
    pub empty_suites: Vec<String>,
}

/// Output of a summariser invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Report {
    Correctness(CorrectnessReport),
    Performance(PerformanceReport),
}

/// Serialize the report to a writer as pretty JSON
pub fn store_report<W: Write>(report: &Report, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// Write the report to a new file at `path`
pub fn write_report(report: &Report, path: &Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)?;
    store_report(report, &mut file)?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Load a report from a reader
pub fn load_report<R: Read>(reader: R) -> anyhow::Result<Report> {
    let reader = std::io::BufReader::new(reader);
    let report: Report = serde_json::from_reader(reader)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_observed_ranks_after_any_run() {
        assert!(TriggeringRun::Observed(u32::MAX) < TriggeringRun::NeverObserved);
        assert!(TriggeringRun::Observed(2) < TriggeringRun::Observed(3));
    }

    #[test]
    fn success_ranks_as_run_zero() {
        let success = RunRecord::success(10.0);
        let failure = RunRecord::failure(TriggeringRun::Observed(1), 0.5);
        assert_eq!(success.triggering_run(), TriggeringRun::Observed(0));
        assert_eq!(success.rank_cmp(&failure), Ordering::Less);
    }

    #[test]
    fn rank_breaks_ties_on_duration() {
        let slow = RunRecord::failure(TriggeringRun::Observed(4), 9.0);
        let fast = RunRecord::failure(TriggeringRun::Observed(4), 3.0);
        assert_eq!(fast.rank_cmp(&slow), Ordering::Less);
    }

    #[test]
    fn unavailable_record_has_no_duration() {
        let record = RunRecord::unavailable();
        assert_eq!(record.duration_secs(), None);
        assert_eq!(record.triggering_run(), TriggeringRun::NeverObserved);
    }

    #[test]
    fn delay_record_rejects_non_positive_totals() {
        assert!(!DelayRecord::from_totals(0, 120).is_available());
        assert!(!DelayRecord::from_totals(12, -1).is_available());
        assert_eq!(
            DelayRecord::from_totals(20, 200),
            DelayRecord {
                delay_count: 20,
                total_delay_ms: 200
            }
        );
    }

    #[test]
    fn policy_dir_names() {
        assert_eq!(Policy::Wafl.to_string(), "wafl");
        assert_eq!(Policy::WaflBasic.dir_name(), "waflbasic");
        assert!(!Policy::Original.is_injected());
    }

    #[test]
    fn scenario_id_display() {
        let id = ScenarioId::new("netmq", "Issue814");
        assert_eq!(id.to_string(), "netmq@Issue814");
    }

    #[test]
    fn report_round_trips_through_file() -> anyhow::Result<()> {
        let mut suites = BTreeMap::new();
        suites.insert(
            "netmq".to_string(),
            SuiteRow {
                benchmark: "netmq".to_string(),
                scenarios: 2,
                timing: PerPolicy::from_fn(|_| RunTiming::new(1.5, 1.25)),
                delays: PerPolicy::from_fn(|p| {
                    if p.is_injected() {
                        DelayRecord::from_totals(10, 400)
                    } else {
                        DelayRecord::unavailable()
                    }
                }),
            },
        );
        let report = Report::Performance(PerformanceReport {
            suites,
            empty_suites: vec!["kubernetes".to_string()],
        });

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("report.json");
        write_report(&report, &path)?;

        let loaded = load_report(std::fs::File::open(&path)?)?;
        assert_eq!(report, loaded);
        Ok(())
    }
}
