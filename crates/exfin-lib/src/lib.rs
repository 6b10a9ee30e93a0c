//! Rust library for downloading monthly tick archives.
//!
//! This is a facade crate that re-exports functionality from the exfin
//! workspace crates and adds [`TickArchive`], a session that loads the
//! pair listing once and downloads date ranges month by month.
//!
//! # Quick Start
//!
//! ```ignore
//! use exfin_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let archive = TickArchive::connect(ClientConfig::default()).await?;
//!     println!("{} pairs available", archive.available_pairs().len());
//!
//!     let range = DateRange::parse("2024-01-01", Some("2024-03-31"))?;
//!     let download = archive.download("eurusd", range, None).await?;
//!
//!     println!("Downloaded {} rows", download.frame.len());
//!     for failure in &download.failures {
//!         eprintln!("{failure}");
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/exfin-rs/exfin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod archive;

pub use archive::{Download, TickArchive};

// Re-export core types
pub use exfin_types::*;

// Re-export the registry
pub use exfin_registry::{PairRegistry, parse_listing_line};

// Re-export fetch functionality
pub use exfin_fetch::{
    BatchReport, ClientConfig, DownloadClient, DownloadError, ExtractError, FailureKind,
    MonthFailure, MonthFetcher, MonthFrame, MonthOutcome, ParseError, Transport, collect_batch,
    extract_entry, extract_to_dir, month_stream, parse_frame, parse_timestamp, url,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use exfin_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat,
};

#[cfg(all(feature = "format", feature = "parquet"))]
pub use exfin_format::ParquetFormatter;

/// Prelude module for convenient imports.
///
/// ```
/// use exfin_lib::prelude::*;
/// ```
pub mod prelude {
    pub use crate::archive::{Download, TickArchive};

    pub use exfin_types::{
        DateRange, DateRangeError, ExfinError, MonthTarget, Pair, Result, Row, TickFrame, Value,
    };

    pub use exfin_registry::PairRegistry;

    pub use exfin_fetch::{ClientConfig, DownloadClient, FailureKind, MonthFailure, Transport};

    #[cfg(feature = "format")]
    pub use exfin_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(all(feature = "format", feature = "parquet"))]
    pub use exfin_format::ParquetFormatter;
}
