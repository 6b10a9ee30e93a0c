//! Timestamp-indexed tick tables.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Name of the column promoted to the row index.
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric cell.
    Float(f64),
    /// Non-numeric cell.
    Text(String),
    /// Missing cell.
    Empty,
}

impl Value {
    /// Infers a value from a raw CSV field.
    #[must_use]
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        trimmed
            .parse::<f64>()
            .map_or_else(|_| Self::Text(raw.to_string()), Self::Float)
    }

    /// Returns the numeric value, if any.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text value, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for a missing cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Empty => Ok(()),
        }
    }
}

/// One table row: its index timestamp and one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Row index.
    pub timestamp: DateTime<Utc>,
    /// Cell values, aligned with [`TickFrame::columns`].
    pub values: Vec<Value>,
}

impl Row {
    /// Creates a new row.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, values: Vec<Value>) -> Self {
        Self { timestamp, values }
    }
}

/// A table of tick records indexed by timestamp.
///
/// Columns are whatever fields the source file carried besides
/// [`TIMESTAMP_COLUMN`], in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickFrame {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TickFrame {
    /// Creates an empty frame with the given columns.
    #[must_use]
    pub const fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with [`Value::Empty`].
    pub fn push(&mut self, mut row: Row) {
        row.values.resize(self.columns.len(), Value::Empty);
        self.rows.push(row);
    }

    /// Returns the column names (excluding the index).
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row index.
    pub fn index(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.rows.iter().map(|row| row.timestamp)
    }

    /// Returns the earliest and latest index timestamps.
    #[must_use]
    pub fn index_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.index().min()?;
        let last = self.index().max()?;
        Some((first, last))
    }

    /// Returns the values of a named column.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(move |row| &row.values[position]))
    }

    /// Stably sorts rows by their index timestamp.
    pub fn sort_by_index(&mut self) {
        self.rows.sort_by_key(|row| row.timestamp);
    }

    /// Concatenates frames in the given order.
    ///
    /// Columns are the union of all input columns in first-seen order;
    /// cells a frame does not carry are [`Value::Empty`].
    #[must_use]
    pub fn concat(frames: impl IntoIterator<Item = Self>) -> Self {
        let frames: Vec<Self> = frames.into_iter().collect();

        let mut columns: Vec<String> = Vec::new();
        for frame in &frames {
            for column in &frame.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let total = frames.iter().map(Self::len).sum();
        let mut merged = Self {
            columns,
            rows: Vec::with_capacity(total),
        };

        for frame in frames {
            if frame.columns == merged.columns {
                merged.rows.extend(frame.rows);
                continue;
            }
            let mapping: Vec<usize> = frame
                .columns
                .iter()
                .filter_map(|c| merged.columns.iter().position(|m| m == c))
                .collect();
            for row in frame.rows {
                let mut values = vec![Value::Empty; merged.columns.len()];
                for (value, &target) in row.values.into_iter().zip(&mapping) {
                    values[target] = value;
                }
                merged.rows.push(Row::new(row.timestamp, values));
            }
        }

        merged
    }
}
