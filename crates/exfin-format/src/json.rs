//! JSON output format.

use exfin_types::{Row, TIMESTAMP_COLUMN, TickFrame};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Write;

use crate::{FormatError, Formatter, TIMESTAMP_FORMAT};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

/// A row rendered as an object keyed by column name.
struct RowObject<'a> {
    columns: &'a [String],
    row: &'a Row,
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry(
            TIMESTAMP_COLUMN,
            &self.row.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        )?;
        for (column, value) in self.columns.iter().zip(&self.row.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Formatter for JsonFormatter {
    fn write_frame<W: Write + Send>(
        &self,
        frame: &TickFrame,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let objects = frame.rows().iter().map(|row| RowObject {
            columns: frame.columns(),
            row,
        });

        match self.style {
            JsonStyle::Array => {
                let objects: Vec<_> = objects.collect();
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &objects)?;
                } else {
                    serde_json::to_writer(&mut writer, &objects)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for object in objects {
                    serde_json::to_writer(&mut writer, &object)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
