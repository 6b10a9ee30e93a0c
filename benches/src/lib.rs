//! Synthetic archive generation for exfin benchmarks.

use chrono::{Duration, NaiveTime};
use exfin_lib::url::ArchiveLayout;
use exfin_lib::{MonthTarget, Pair};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Shape of a generated month.
#[derive(Debug, Clone)]
pub struct SyntheticMonth {
    /// Pair written into every row.
    pub pair: String,
    /// Month to generate.
    pub month: MonthTarget,
    /// Number of tick rows.
    pub rows: usize,
}

impl SyntheticMonth {
    /// Creates a month of `rows` EURUSD ticks.
    pub fn new(year: i32, month: u32, rows: usize) -> Option<Self> {
        Some(Self {
            pair: "EURUSD".to_string(),
            month: MonthTarget::new(year, month)?,
            rows,
        })
    }

    /// Renders the month as an archive CSV table.
    ///
    /// Ticks are spaced 250ms apart from the first of the month.
    pub fn csv(&self) -> String {
        let mut out = String::with_capacity(self.rows * 64 + 64);
        out.push_str("\"Exness\",\"Symbol\",\"Timestamp\",\"Bid\",\"Ask\"\n");

        let origin = self.month.first_day().and_time(NaiveTime::MIN);
        for i in 0..self.rows {
            let ts = origin + Duration::milliseconds(250 * i as i64);
            let bid = 1.08 + (i % 500) as f64 * 0.00001;
            out.push_str(&format!(
                "\"exness\",\"{}\",\"{}Z\",{bid:.5},{:.5}\n",
                self.pair,
                ts.format("%Y-%m-%d %H:%M:%S%.3f"),
                bid + 0.00006
            ));
        }
        out
    }

    /// Packs the month into a ZIP archive named by `layout`.
    pub fn archive(&self, layout: &ArchiveLayout) -> zip::result::ZipResult<Vec<u8>> {
        let entry = layout.entry_name(&Pair::new(&self.pair), self.month);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(entry, SimpleFileOptions::default())?;
        writer.write_all(self.csv().as_bytes())?;
        Ok(writer.finish()?.into_inner())
    }
}
