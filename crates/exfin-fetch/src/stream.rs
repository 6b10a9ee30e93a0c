//! Bounded concurrent month downloads and batch collection.

use exfin_types::{MonthTarget, Pair, TickFrame};
use futures::stream::{self, Stream, StreamExt};

use crate::{MonthFailure, MonthFetcher, MonthFrame, MonthOutcome};

/// Creates a stream fetching every month concurrently.
///
/// At most `concurrency` months are in flight at once (a value of zero is
/// treated as one). Outcomes are yielded in completion order, and a failed
/// month never cancels the others.
pub fn month_stream(
    fetcher: MonthFetcher,
    pair: Pair,
    months: Vec<MonthTarget>,
    concurrency: usize,
) -> impl Stream<Item = MonthOutcome> {
    stream::iter(months)
        .map(move |month| {
            let fetcher = fetcher.clone();
            let pair = pair.clone();
            async move { fetcher.fetch_month(&pair, month).await }
        })
        .buffer_unordered(concurrency.max(1))
}

/// Outcomes of a batch, collected in completion order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    frames: Vec<MonthFrame>,
    failures: Vec<MonthFailure>,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Records one month's outcome.
    pub fn record(&mut self, outcome: MonthOutcome) {
        match outcome {
            Ok(frame) => self.frames.push(frame),
            Err(failure) => self.failures.push(failure),
        }
    }

    /// Returns the number of months recorded.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.frames.len() + self.failures.len()
    }

    /// Returns the months that succeeded, in completion order.
    pub fn succeeded(&self) -> impl Iterator<Item = MonthTarget> + '_ {
        self.frames.iter().map(|f| f.month)
    }

    /// Returns the failures, in completion order.
    #[must_use]
    pub fn failures(&self) -> &[MonthFailure] {
        &self.failures
    }

    /// Returns true if at least one month produced a table.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Merges the successful tables and sorts rows by timestamp.
    ///
    /// Failures are returned sorted by month.
    #[must_use]
    pub fn into_parts(self) -> (TickFrame, Vec<MonthFailure>) {
        let mut frame = TickFrame::concat(self.frames.into_iter().map(|m| m.frame));
        frame.sort_by_index();

        let mut failures = self.failures;
        failures.sort_by_key(|f| f.month);
        (frame, failures)
    }
}

impl Extend<MonthOutcome> for BatchReport {
    fn extend<T: IntoIterator<Item = MonthOutcome>>(&mut self, iter: T) {
        for outcome in iter {
            self.record(outcome);
        }
    }
}

/// Drains a month stream into a report.
pub async fn collect_batch(outcomes: impl Stream<Item = MonthOutcome>) -> BatchReport {
    outcomes
        .fold(BatchReport::new(), |mut report, outcome| async move {
            report.record(outcome);
            report
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use chrono::{TimeZone, Utc};
    use exfin_types::{Row, Value};

    fn month(m: u32) -> MonthTarget {
        MonthTarget::new(2024, m).unwrap()
    }

    fn frame_at(m: u32) -> MonthFrame {
        let mut frame = TickFrame::new(vec!["Bid".to_string()]);
        let ts = Utc.with_ymd_and_hms(2024, m, 1, 0, 0, 0).unwrap();
        frame.push(Row::new(ts, vec![Value::Float(f64::from(m))]));
        MonthFrame {
            month: month(m),
            frame,
        }
    }

    fn failure_at(m: u32) -> MonthFailure {
        MonthFailure {
            month: month(m),
            kind: FailureKind::Network,
            cause: "status 404".to_string(),
        }
    }

    #[tokio::test]
    async fn test_collect_batch_counts_everything() {
        let outcomes = stream::iter(vec![Err(failure_at(2)), Ok(frame_at(1)), Err(failure_at(3))]);
        let report = collect_batch(outcomes).await;

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.failures().len(), 2);
        assert!(report.has_data());
    }

    #[test]
    fn test_into_parts_sorts_by_timestamp() {
        let mut report = BatchReport::new();
        report.extend([Ok(frame_at(3)), Err(failure_at(2)), Ok(frame_at(1)), Err(failure_at(1))]);

        let (frame, failures) = report.into_parts();
        let index: Vec<_> = frame.index().collect();
        assert!(index.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(frame.len(), 2);
        assert_eq!(
            failures.iter().map(|f| f.month).collect::<Vec<_>>(),
            [month(1), month(2)]
        );
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::new();
        assert!(!report.has_data());
        assert_eq!(report.attempted(), 0);
    }
}
