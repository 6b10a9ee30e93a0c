//! CSV output format.

use exfin_types::{TIMESTAMP_COLUMN, TickFrame, Value};
use std::io::Write;

use crate::{FormatError, Formatter, TIMESTAMP_FORMAT};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_frame<W: Write + Send>(
        &self,
        frame: &TickFrame,
        writer: W,
    ) -> Result<(), FormatError> {
        let mut out = ::csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        if self.include_header {
            out.write_field(TIMESTAMP_COLUMN)?;
            for column in frame.columns() {
                out.write_field(column)?;
            }
            out.write_record(None::<&[u8]>)?;
        }

        for row in frame.rows() {
            out.write_field(row.timestamp.format(TIMESTAMP_FORMAT).to_string())?;
            for value in &row.values {
                match value {
                    Value::Empty => out.write_field("")?,
                    other => out.write_field(other.to_string())?,
                }
            }
            out.write_record(None::<&[u8]>)?;
        }

        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == b'\t' { "tsv" } else { "csv" }
    }
}
