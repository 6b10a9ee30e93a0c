//! Apache Parquet output format.

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use exfin_types::{Row, TIMESTAMP_COLUMN, TickFrame, Value};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Builds the Arrow schema for a frame.
    ///
    /// A column whose cells are all numbers or empty is `Float64`;
    /// anything else is stored as text.
    fn frame_schema(frame: &TickFrame) -> Schema {
        let mut fields = Vec::with_capacity(frame.columns().len() + 1);
        fields.push(Field::new(
            TIMESTAMP_COLUMN,
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        ));

        for (i, name) in frame.columns().iter().enumerate() {
            let numeric = frame
                .rows()
                .iter()
                .all(|row| matches!(row.values[i], Value::Float(_) | Value::Empty));
            let data_type = if numeric {
                DataType::Float64
            } else {
                DataType::Utf8
            };
            fields.push(Field::new(name, data_type, true));
        }

        Schema::new(fields)
    }

    /// Converts a slice of rows to an Arrow `RecordBatch`.
    fn rows_to_batch(schema: &SchemaRef, rows: &[Row]) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = rows.iter().map(|r| r.timestamp.timestamp_millis()).collect();

        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
        arrays.push(Arc::new(
            TimestampMillisecondArray::from(timestamps).with_timezone("UTC"),
        ));

        for (i, field) in schema.fields().iter().skip(1).enumerate() {
            let array: ArrayRef = match field.data_type() {
                DataType::Float64 => {
                    let values: Vec<_> = rows.iter().map(|r| r.values[i].as_f64()).collect();
                    Arc::new(Float64Array::from(values))
                }
                _ => {
                    let values: Vec<_> = rows
                        .iter()
                        .map(|r| match &r.values[i] {
                            Value::Empty => None,
                            other => Some(other.to_string()),
                        })
                        .collect();
                    Arc::new(StringArray::from(values))
                }
            };
            arrays.push(array);
        }

        RecordBatch::try_new(Arc::clone(schema), arrays)
            .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_frame<W: Write + Send>(
        &self,
        frame: &TickFrame,
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::frame_schema(frame));
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in frame.rows().chunks(self.row_group_size.max(1)) {
            let batch = Self::rows_to_batch(&schema, chunk)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
