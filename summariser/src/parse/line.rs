use std::fmt;

use super::LogParseError;

pub(crate) const RUN_HEADER: &str = "@Run #";
pub(crate) const TOTAL_TIME: &str = "Total time";
pub(crate) const DELAY_STATS_HEADER: &str = "TotalDelayMs";

/// Substrings that identify a crashed test run.
pub(crate) const CRASH_SIGNATURES: [&str; 4] = [
    "ObjectDisposedException",
    "NullReferenceException",
    "NetMQ.FaultException : Cannot close an uninitialised Msg",
    "Nullable object must have a value",
];

/// The kinds of line the parsers extract fields from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    RunHeader,
    TotalTime,
    DelayTotals,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::RunHeader => write!(f, "run header"),
            LineKind::TotalTime => write!(f, "total time line"),
            LineKind::DelayTotals => write!(f, "delay totals row"),
        }
    }
}

/// A run log line reduced to the fields the parsers use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RunLogLine {
    /// `@Run # <run>`
    RunHeader { run: u32 },
    /// `Total time: <value> <unit>`, converted to seconds
    TotalTime { seconds: f64 },
    /// Any line containing one of [CRASH_SIGNATURES]
    CrashSignature,
    Other,
}

/// A delay stats line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelayStatsLine {
    Header,
    Blank,
    /// `<amount>\t<count>`
    Totals { amount_ms: i64, count: i64 },
}

/// Classify the lines of a run log one at a time, so a scan that stops early never sees the rest.
/// Line numbers in errors are 1-based.
pub(crate) fn run_log_lines(
    text: &str,
) -> impl Iterator<Item = Result<RunLogLine, LogParseError>> + '_ {
    text.lines().enumerate().map(|(idx, line)| {
        classify_run_log_line(line).ok_or_else(|| LogParseError::MalformedLine {
            line: idx + 1,
            kind: malformed_kind(line),
            text: line.to_string(),
        })
    })
}

/// Classify every line of a run log.
pub(crate) fn tokenize_run_log(text: &str) -> Result<Vec<RunLogLine>, LogParseError> {
    run_log_lines(text).collect()
}

pub(crate) fn tokenize_delay_stats(text: &str) -> Result<Vec<DelayStatsLine>, LogParseError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            classify_delay_stats_line(line).ok_or_else(|| LogParseError::MalformedLine {
                line: idx + 1,
                kind: LineKind::DelayTotals,
                text: line.to_string(),
            })
        })
        .collect()
}

fn malformed_kind(line: &str) -> LineKind {
    if line.trim_start().starts_with(RUN_HEADER) {
        LineKind::RunHeader
    } else {
        LineKind::TotalTime
    }
}

/// Returns [None] when the line is a header or timing line that does not have the expected shape.
fn classify_run_log_line(line: &str) -> Option<RunLogLine> {
    let trimmed = line.trim();
    if trimmed.starts_with(RUN_HEADER) {
        return parse_run_header(trimmed).map(|run| RunLogLine::RunHeader { run });
    }
    if trimmed.contains(TOTAL_TIME) {
        return parse_total_time(trimmed).map(|seconds| RunLogLine::TotalTime { seconds });
    }
    if CRASH_SIGNATURES.iter().any(|signature| trimmed.contains(signature)) {
        return Some(RunLogLine::CrashSignature);
    }
    Some(RunLogLine::Other)
}

fn parse_run_header(trimmed: &str) -> Option<u32> {
    let mut tokens = trimmed.split_whitespace();
    let (Some("@Run"), Some("#"), Some(run), None) =
        (tokens.next(), tokens.next(), tokens.next(), tokens.next())
    else {
        return None;
    };
    run.parse().ok()
}

fn parse_total_time(trimmed: &str) -> Option<f64> {
    let mut tokens = trimmed.split_whitespace();
    let (Some("Total"), Some("time:" | "time"), Some(value), unit, None) = (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) else {
        return None;
    };
    let value = value.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(value * unit_scale(unit)?)
}

fn unit_scale(unit: Option<&str>) -> Option<f64> {
    match unit {
        None | Some("Seconds" | "Second" | "seconds" | "sec" | "s") => Some(1.0),
        Some("Minutes" | "Minute" | "minutes" | "min") => Some(60.0),
        Some("Hours" | "Hour" | "hours" | "h") => Some(3600.0),
        Some("Milliseconds" | "milliseconds" | "ms") => Some(0.001),
        Some(_) => None,
    }
}

fn classify_delay_stats_line(line: &str) -> Option<DelayStatsLine> {
    if line.contains(DELAY_STATS_HEADER) {
        return Some(DelayStatsLine::Header);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Some(DelayStatsLine::Blank);
    }
    let mut columns = trimmed.split('\t');
    let (Some(amount), Some(count), None) = (columns.next(), columns.next(), columns.next()) else {
        return None;
    };
    Some(DelayStatsLine::Totals {
        amount_ms: amount.trim().parse().ok()?,
        count: count.trim().parse().ok()?,
    })
}
