use itertools::Itertools;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};
use wafl_summary_model::{
    CorrectnessReport, DelayRecord, PerformanceReport, RunTiming, SuiteRow, TriggeringRun,
};

use crate::catalogue;

/// Cell text for anything that was not measured.
pub const NOT_AVAILABLE: &str = "n/a";

#[derive(Tabled)]
struct CorrectnessTableRow {
    #[tabled(rename = "No")]
    label: String,
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "ID")]
    issue: String,
    #[tabled(rename = "Original-time (ms)")]
    original_time: String,
    #[tabled(rename = "WaflBasic-runs")]
    wafl_basic_runs: String,
    #[tabled(rename = "Wafl-runs")]
    wafl_runs: String,
    #[tabled(rename = "WaflBasic-slowdown (x)")]
    wafl_basic_slowdown: String,
    #[tabled(rename = "Wafl-slowdown (x)")]
    wafl_slowdown: String,
}

#[derive(Tabled)]
struct TimingTableRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Base (ms)")]
    base: String,
    #[tabled(rename = "WaflBasic-run1 (ms)")]
    wafl_basic_first: String,
    #[tabled(rename = "WaflBasic-run2 (ms)")]
    wafl_basic_second: String,
    #[tabled(rename = "Wafl-run1 (ms)")]
    wafl_first: String,
    #[tabled(rename = "Wafl-run2 (ms)")]
    wafl_second: String,
}

#[derive(Tabled)]
struct DelayTableRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "WaflBasic-#delays")]
    wafl_basic_count: String,
    #[tabled(rename = "WaflBasic-duration (ms)")]
    wafl_basic_amount: String,
    #[tabled(rename = "Wafl-#delays")]
    wafl_count: String,
    #[tabled(rename = "Wafl-duration (ms)")]
    wafl_amount: String,
}

/// Bug triggering statistics, one row per scenario, ordered by bug label.
pub fn correctness_table(report: &CorrectnessReport) -> String {
    let rows = report
        .rows
        .values()
        .map(|row| (catalogue::label_for(&row.scenario), row))
        .sorted_by_key(|(label, row)| {
            (
                label.is_unlabeled(),
                label.label.len(),
                label.label,
                row.scenario.clone(),
            )
        })
        .map(|(label, row)| CorrectnessTableRow {
            label: label.label.to_string(),
            application: row.scenario.benchmark.clone(),
            issue: label
                .issue
                .map(|issue| issue.to_string())
                .unwrap_or_else(not_available),
            original_time: millis(row.time_baseline_secs),
            wafl_basic_runs: runs(row.attempts_basic),
            wafl_runs: runs(row.attempts_full),
            wafl_basic_slowdown: ratio(row.slowdown_basic),
            wafl_slowdown: ratio(row.slowdown_full),
        })
        .collect::<Vec<_>>();

    markdown(rows)
}

/// Mean running times per benchmark suite.
pub fn timing_table(report: &PerformanceReport) -> String {
    let rows = sorted_suites(report)
        .map(|suite| {
            let (wafl_basic_first, wafl_basic_second) = timing_cells(&suite.timing.wafl_basic);
            let (wafl_first, wafl_second) = timing_cells(&suite.timing.wafl);
            TimingTableRow {
                application: suite.benchmark.clone(),
                base: base_cell(&suite.timing.original),
                wafl_basic_first,
                wafl_basic_second,
                wafl_first,
                wafl_second,
            }
        })
        .collect::<Vec<_>>();

    markdown(rows)
}

/// Mean number and total duration of injected delays per benchmark suite.
pub fn delay_table(report: &PerformanceReport) -> String {
    let rows = sorted_suites(report)
        .map(|suite| {
            let (wafl_basic_count, wafl_basic_amount) = delay_cells(&suite.delays.wafl_basic);
            let (wafl_count, wafl_amount) = delay_cells(&suite.delays.wafl);
            DelayTableRow {
                application: suite.benchmark.clone(),
                wafl_basic_count,
                wafl_basic_amount,
                wafl_count,
                wafl_amount,
            }
        })
        .collect::<Vec<_>>();

    markdown(rows)
}

/// Both performance tables, each under a heading.
pub fn performance_tables(report: &PerformanceReport) -> String {
    format!(
        "{}\n{}\n\n{}\n{}\n",
        heading("Running time measurements (ms):"),
        timing_table(report),
        heading("Delay injection statistics:"),
        delay_table(report),
    )
}

fn heading(title: &str) -> String {
    format!("\n{title}\n{}\n", "=".repeat(title.len()))
}

fn markdown<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown()).with(Alignment::right());
    table.to_string()
}

fn sorted_suites(report: &PerformanceReport) -> impl Iterator<Item = &SuiteRow> {
    report
        .suites
        .values()
        .sorted_by_key(|suite| (suite.benchmark.len(), suite.benchmark.as_str()))
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Whole milliseconds, truncated.
fn millis(secs: f64) -> String {
    if secs > 0.0 {
        ((secs * 1000.0) as u64).to_string()
    } else {
        not_available()
    }
}

fn runs(triggering_run: TriggeringRun) -> String {
    triggering_run
        .index()
        .map(|run| run.to_string())
        .unwrap_or_else(not_available)
}

fn ratio(ratio: Option<f64>) -> String {
    ratio
        .map(|ratio| format!("{ratio:.1}"))
        .unwrap_or_else(not_available)
}

/// Mean of the baseline's two runs.
fn base_cell(timing: &RunTiming) -> String {
    if timing.is_available() {
        millis((timing.first_run_secs + timing.second_run_secs) / 2.0)
    } else {
        not_available()
    }
}

fn timing_cells(timing: &RunTiming) -> (String, String) {
    if timing.is_available() {
        (millis(timing.first_run_secs), millis(timing.second_run_secs))
    } else {
        (not_available(), not_available())
    }
}

fn delay_cells(delays: &DelayRecord) -> (String, String) {
    if delays.is_available() {
        (
            delays.delay_count.to_string(),
            delays.total_delay_ms.to_string(),
        )
    } else {
        (not_available(), not_available())
    }
}
