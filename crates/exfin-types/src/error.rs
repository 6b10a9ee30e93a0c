//! Error types for exfin.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{DateRange, Pair};

/// Result type alias for exfin operations.
pub type Result<T> = std::result::Result<T, ExfinError>;

/// Errors that terminate a registry construction or a download call.
///
/// Failures of individual months never surface here; they are collected
/// alongside the downloaded table instead.
#[derive(Error, Debug)]
pub enum ExfinError {
    /// The requested pair is not in the registry.
    #[error("Pair '{pair}' not available. Use available_pairs() to see available options.")]
    NotAvailable {
        /// The normalized pair that was requested.
        pair: Pair,
    },

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Every month in the requested range failed.
    #[error("No data was downloaded for {pair} in {range} ({failures} of {attempted} months failed)")]
    NoData {
        /// The pair that had no data.
        pair: Pair,
        /// The requested range.
        range: DateRange,
        /// Number of months attempted.
        attempted: usize,
        /// Number of months that failed.
        failures: usize,
    },

    /// The pair listing could not be retrieved or decoded.
    #[error("Listing error: {0}")]
    Listing(String),

    /// HTTP client construction or request failed.
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Start date {start} is after end date {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string was not in `YYYY-MM-DD` form.
    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },
}
