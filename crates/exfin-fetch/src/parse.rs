//! CSV table parsing.

use std::collections::HashSet;
use std::io::Read;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use exfin_types::{Row, TIMESTAMP_COLUMN, TickFrame, Value};
use thiserror::Error;

/// Errors that can occur while parsing an archive table.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed CSV (bad quoting, ragged rows, invalid UTF-8).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row has no timestamp column.
    #[error("Missing '{TIMESTAMP_COLUMN}' column")]
    MissingTimestamp,

    /// The header row names a column more than once.
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    /// A timestamp cell could not be interpreted.
    #[error("Invalid timestamp '{value}' on line {line}")]
    InvalidTimestamp {
        /// 1-based line number, counting the header.
        line: u64,
        /// The rejected cell.
        value: String,
    },
}

/// Parses a delimited table, promoting the `Timestamp` column to the index.
///
/// All other columns are kept in file order, with each cell inferred as a
/// number, text, or empty.
///
/// # Errors
///
/// Returns an error if the CSV is malformed, a column name repeats, the
/// timestamp column is missing, or any timestamp cannot be parsed.
pub fn parse_frame<R: Read>(reader: R) -> Result<TickFrame, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut seen = HashSet::with_capacity(headers.len());
    if let Some(duplicate) = headers.iter().find(|h| !seen.insert(*h)) {
        return Err(ParseError::DuplicateColumn(duplicate.to_string()));
    }

    let timestamp_index = headers
        .iter()
        .position(|h| h == TIMESTAMP_COLUMN)
        .ok_or(ParseError::MissingTimestamp)?;

    let columns = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != timestamp_index)
        .map(|(_, h)| h.to_string())
        .collect();
    let mut frame = TickFrame::new(columns);

    for record in reader.records() {
        let record = record?;
        let raw = record.get(timestamp_index).unwrap_or_default();
        let timestamp = parse_timestamp(raw).ok_or_else(|| ParseError::InvalidTimestamp {
            line: record.position().map_or(0, csv::Position::line),
            value: raw.to_string(),
        })?;

        let values = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != timestamp_index)
            .map(|(_, field)| Value::infer(field))
            .collect();
        frame.push(Row::new(timestamp, values));
    }

    Ok(frame)
}

/// Parses a timestamp cell as UTC.
///
/// Accepts RFC 3339 (`2024-01-15T00:00:00.032Z`), space-separated
/// date-times with or without a trailing `Z` and fractional seconds, and
/// bare dates.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
