use wafl_summary_model::DelayRecord;

use super::line::{tokenize_delay_stats, DelayStatsLine};
use super::LogParseError;

/// Parse a `Stats-<timestamp>.log` delay injection summary:
///
/// ```text
/// #(0)TotalDelayMs	(1)TotalDelayCount
/// 12345	67
/// ```
///
/// The last data row is authoritative. A log without data rows, or with a non-positive total,
/// gives an unavailable record.
pub fn parse_delay_stats(text: &str) -> Result<DelayRecord, LogParseError> {
    let last = tokenize_delay_stats(text)?
        .into_iter()
        .filter_map(|line| match line {
            DelayStatsLine::Totals { amount_ms, count } => Some((count, amount_ms)),
            DelayStatsLine::Header | DelayStatsLine::Blank => None,
        })
        .last();

    Ok(match last {
        Some((count, amount_ms)) => DelayRecord::from_totals(count, amount_ms),
        None => DelayRecord::unavailable(),
    })
}
