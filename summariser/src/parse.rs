use std::path::{Path, PathBuf};

pub mod delay_stats;
mod line;
pub mod run_log;

pub use line::LineKind;

/// Failures while reading or parsing a single trial log.
///
/// These never abort a summary. The collector turns them into unavailable records.
#[derive(Debug, thiserror::Error)]
pub enum LogParseError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No `{marker}` line found")]
    MissingMarker { marker: &'static str },
    #[error("Malformed {kind} on line {line}: {text:?}")]
    MalformedLine {
        line: usize,
        kind: LineKind,
        text: String,
    },
}

/// Read a run log, which the test harness writes as UTF-16.
pub fn read_run_log(path: &Path) -> Result<String, LogParseError> {
    let bytes = read_bytes(path)?;
    Ok(decode_utf16_log(&bytes))
}

/// Read a delay stats log, which is UTF-8.
pub fn read_stats_log(path: &Path) -> Result<String, LogParseError> {
    let bytes = read_bytes(path)?;
    Ok(strip_bom(String::from_utf8_lossy(&bytes).into_owned()))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, LogParseError> {
    std::fs::read(path).map_err(|source| LogParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode UTF-16 honouring a byte order mark, little endian otherwise.
///
/// Input without a BOM and without any NUL byte cannot be UTF-16 text and is read as UTF-8.
pub(crate) fn decode_utf16_log(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_units(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_units(rest, u16::from_be_bytes),
        _ if bytes.len() % 2 == 0 && bytes.contains(&0) => {
            decode_units(bytes, u16::from_le_bytes)
        }
        _ => strip_bom(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_units(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect::<Vec<_>>();
    String::from_utf16_lossy(&units)
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
