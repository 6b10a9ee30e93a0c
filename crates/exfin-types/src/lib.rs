//! Core types for the exfin tick archive downloader.
//!
//! This crate provides the fundamental data structures used throughout exfin:
//!
//! - [`Pair`] - An uppercase instrument identifier (e.g. `EURUSD`)
//! - [`DateRange`] - A validated calendar date range
//! - [`MonthTarget`] - One monthly archive to fetch
//! - [`TickFrame`] - A timestamp-indexed table of tick records
//! - [`ExfinError`] - Batch-level error taxonomy

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/exfin-rs/exfin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod frame;
mod pair;

pub use date_range::{DateRange, MonthIterator, MonthTarget};
pub use error::{DateRangeError, ExfinError, Result};
pub use frame::{Row, TIMESTAMP_COLUMN, TickFrame, Value};
pub use pair::Pair;
