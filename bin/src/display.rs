//! Display utilities and output formatting for the exfin CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use exfin_lib::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[cfg(not(feature = "parquet"))]
use anyhow::bail;

/// Output format for downloaded data.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Tsv,
    Json,
    Ndjson,
    Parquet,
}

impl Format {
    /// Returns the file extension for this format.
    pub(crate) const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Write a merged table to a file in the specified format.
pub(crate) fn write_frame(frame: &TickFrame, output: &Path, format: Format) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let writer = BufWriter::new(file);
    tracing::debug!(path = %output.display(), %format, rows = frame.len(), "writing output");

    match format {
        Format::Csv => CsvFormatter::new().write_frame(frame, writer)?,
        Format::Tsv => CsvFormatter::tsv().write_frame(frame, writer)?,
        Format::Json => JsonFormatter::new().write_frame(frame, writer)?,
        Format::Ndjson => JsonFormatter::ndjson().write_frame(frame, writer)?,
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                ParquetFormatter::new().write_frame(frame, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

/// Print the months that failed, one per line.
pub(crate) fn print_failures(failures: &[MonthFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("{} month(s) failed:", failures.len());
    for failure in failures {
        tracing::warn!(month = %failure.month, kind = %failure.kind, "month missing from output");
        eprintln!("  {failure}");
    }
}
