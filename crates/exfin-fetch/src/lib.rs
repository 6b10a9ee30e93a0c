//! HTTP client and monthly archive fetching for the exfin tick archive downloader.
//!
//! This crate provides the data download pipeline:
//!
//! - [`url::ArchiveLayout`] - Builds listing and archive URLs
//! - [`DownloadClient`] - HTTP client implementing [`Transport`]
//! - [`extract_entry`] / [`extract_to_dir`] - ZIP extraction
//! - [`parse_frame`] - CSV table parsing
//! - [`MonthFetcher`] - Fetch, extract and parse one month
//! - [`month_stream`] / [`collect_batch`] - Bounded concurrent batches

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/exfin-rs/exfin/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decompress;
mod month;
mod parse;
mod stream;
pub mod url;

pub use client::{ClientConfig, DownloadClient, DownloadError, Transport};
pub use decompress::{ExtractError, extract_entry, extract_to_dir};
pub use month::{FailureKind, MonthFailure, MonthFetcher, MonthFrame, MonthOutcome};
pub use parse::{ParseError, parse_frame, parse_timestamp};
pub use stream::{BatchReport, collect_batch, month_stream};
