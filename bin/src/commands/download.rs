//! Download command implementation.
//!
//! This module downloads every month of a range with a progress bar, reports
//! failed months, and writes the merged table.

use crate::display::{Format, print_failures, write_frame};
use anyhow::{Context, Result};
use exfin_lib::BatchReport;
use exfin_lib::prelude::*;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Arguments of one download.
pub(crate) struct DownloadRequest {
    pub(crate) pair: String,
    pub(crate) start: String,
    pub(crate) end: Option<String>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) format: Format,
    pub(crate) save_path: Option<PathBuf>,
}

/// Download a pair over a date range and write it to a file.
pub(crate) async fn download(config: ClientConfig, request: DownloadRequest, quiet: bool) -> Result<()> {
    let archive = TickArchive::connect(config)
        .await
        .context("Failed to load the pair listing")?;

    let pair = archive.resolve(&request.pair)?;
    let range = DateRange::parse(&request.start, request.end.as_deref())?;

    // Determine output path (default to <pair>.<format>)
    let output = request.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}.{}",
            pair.as_str().to_lowercase(),
            request.format.extension()
        ))
    });

    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(range.total_months() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} months ({percent}%) {msg}")?
                .progress_chars("=>-"),
        );
        pb.set_message(format!("{pair} {range}"));
        pb
    };

    let mut report = BatchReport::new();
    let mut stream = std::pin::pin!(archive.month_stream(&pair, &range, request.save_path.as_deref()));
    while let Some(outcome) = stream.next().await {
        if let Ok(month) = &outcome {
            progress.set_message(format!("{pair} {} ({} rows)", month.month, month.frame.len()));
        }
        report.record(outcome);
        progress.inc(1);
    }

    let failed = report.failures().len();
    let download = TickArchive::assemble(pair, range, report);
    progress.finish_with_message(match &download {
        Ok(d) if failed > 0 => format!("Downloaded {} rows ({failed} months failed)", d.frame.len()),
        Ok(d) => format!("Downloaded {} rows", d.frame.len()),
        Err(_) => "No data".to_string(),
    });
    let download = download?;

    if !quiet {
        print_failures(&download.failures);
    }

    write_frame(&download.frame, &output, request.format)?;

    if !quiet {
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
