//! Download sessions against a tick archive.

use std::path::Path;
use std::sync::Arc;

use exfin_fetch::url::ArchiveLayout;
use exfin_fetch::{
    BatchReport, ClientConfig, DownloadClient, MonthFailure, MonthFetcher, MonthOutcome,
    Transport, collect_batch,
};
use exfin_registry::PairRegistry;
use exfin_types::{DateRange, ExfinError, MonthTarget, Pair, Result, TickFrame};
use futures::Stream;

/// The merged result of a download.
#[derive(Debug, Clone)]
pub struct Download {
    /// The normalized pair.
    pub pair: Pair,
    /// The requested range.
    pub range: DateRange,
    /// Every month attempted, in calendar order.
    pub months: Vec<MonthTarget>,
    /// Rows of all successful months, sorted by timestamp.
    pub frame: TickFrame,
    /// Months that failed, sorted by month.
    pub failures: Vec<MonthFailure>,
}

impl Download {
    /// Returns true if every month succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the months that produced rows.
    pub fn succeeded(&self) -> impl Iterator<Item = MonthTarget> + '_ {
        self.months
            .iter()
            .copied()
            .filter(|m| !self.failures.iter().any(|f| f.month == *m))
    }
}

/// A session bound to one archive.
///
/// The pair listing is fetched once when the session is created and never
/// refreshed.
#[derive(Debug, Clone)]
pub struct TickArchive {
    registry: PairRegistry,
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl TickArchive {
    /// Connects to the archive over HTTP and loads the pair listing.
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::Http`] if the client cannot be built and
    /// [`ExfinError::Listing`] if the listing request fails.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let client = DownloadClient::new(config.clone()).map_err(|e| ExfinError::Http(e.to_string()))?;
        Self::with_transport(Arc::new(client), config).await
    }

    /// Loads the pair listing through the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::Listing`] if the listing request fails.
    pub async fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Result<Self> {
        let url = layout_of(&config).listing_url();
        tracing::info!(%url, "fetching pair listing");

        let body = transport
            .get(&url)
            .await
            .map_err(|e| ExfinError::Listing(format!("{url}: {e}")))?;
        let registry = PairRegistry::from_listing(&String::from_utf8_lossy(&body));

        tracing::info!(
            pairs = registry.len(),
            skipped = registry.skipped_lines(),
            "pair registry ready"
        );
        Ok(Self::from_parts(registry, transport, config))
    }

    /// Creates a session from an existing registry, without any request.
    #[must_use]
    pub fn from_parts(
        registry: PairRegistry,
        transport: Arc<dyn Transport>,
        config: ClientConfig,
    ) -> Self {
        Self {
            registry,
            transport,
            config,
        }
    }

    /// Returns the pair registry.
    #[must_use]
    pub const fn registry(&self) -> &PairRegistry {
        &self.registry
    }

    /// Returns the available pairs in listing order.
    #[must_use]
    pub fn available_pairs(&self) -> &[Pair] {
        self.registry.available_pairs()
    }

    /// Returns the available pairs as an owned list.
    #[must_use]
    pub fn get_available_pairs(&self) -> Vec<Pair> {
        self.available_pairs().to_vec()
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalizes a pair and checks it against the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::NotAvailable`] if the pair is not listed.
    pub fn resolve(&self, pair: &str) -> Result<Pair> {
        self.registry
            .get(pair)
            .cloned()
            .ok_or_else(|| ExfinError::NotAvailable {
                pair: Pair::new(pair),
            })
    }

    /// Returns a fetcher for this archive.
    #[must_use]
    pub fn fetcher(&self, save_path: Option<&Path>) -> MonthFetcher {
        MonthFetcher::new(Arc::clone(&self.transport), layout_of(&self.config))
            .with_save_path(save_path.map(Path::to_path_buf))
    }

    /// Streams the outcome of every month in the range, in completion order.
    ///
    /// The pair is not checked against the registry; use [`Self::resolve`]
    /// first.
    pub fn month_stream(
        &self,
        pair: &Pair,
        range: &DateRange,
        save_path: Option<&Path>,
    ) -> impl Stream<Item = MonthOutcome> + Send + use<> {
        exfin_fetch::month_stream(
            self.fetcher(save_path),
            pair.clone(),
            range.months().collect(),
            self.config.concurrency,
        )
    }

    /// Downloads every month of a range and merges the results.
    ///
    /// Months are fetched concurrently, up to the configured concurrency.
    /// A failed month is recorded in [`Download::failures`] and never
    /// aborts the others.
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::NotAvailable`] for an unlisted pair and
    /// [`ExfinError::NoData`] if every month failed.
    pub async fn download(
        &self,
        pair: &str,
        range: DateRange,
        save_path: Option<&Path>,
    ) -> Result<Download> {
        let pair = self.resolve(pair)?;
        tracing::info!(
            %pair,
            %range,
            months = range.total_months(),
            concurrency = self.config.concurrency,
            "starting download"
        );

        let report = collect_batch(self.month_stream(&pair, &range, save_path)).await;
        Self::assemble(pair, range, report)
    }

    /// Downloads a range given as `YYYY-MM-DD` strings, the end defaulting
    /// to today (UTC).
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::NotAvailable`], [`ExfinError::DateRange`] or
    /// [`ExfinError::NoData`].
    pub async fn download_dates(
        &self,
        pair: &str,
        start: &str,
        end: Option<&str>,
        save_path: Option<&Path>,
    ) -> Result<Download> {
        self.resolve(pair)?;
        let range = DateRange::parse(start, end)?;
        self.download(pair, range, save_path).await
    }

    /// Turns a collected batch into a [`Download`].
    ///
    /// # Errors
    ///
    /// Returns [`ExfinError::NoData`] if no month produced a table.
    pub fn assemble(pair: Pair, range: DateRange, report: BatchReport) -> Result<Download> {
        let attempted = report.attempted();
        if !report.has_data() {
            let failures = report.failures().len();
            tracing::error!(%pair, %range, attempted, "no month could be downloaded");
            return Err(ExfinError::NoData {
                pair,
                range,
                attempted,
                failures,
            });
        }

        let (frame, failures) = report.into_parts();
        tracing::info!(
            %pair,
            rows = frame.len(),
            attempted,
            failed = failures.len(),
            "download complete"
        );

        Ok(Download {
            pair,
            months: range.months().collect(),
            range,
            frame,
            failures,
        })
    }
}

fn layout_of(config: &ClientConfig) -> ArchiveLayout {
    ArchiveLayout::new(&config.base_url, config.file_prefix.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use exfin_fetch::{FailureKind, MonthFrame};
    use exfin_types::{Row, Value};

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
        .unwrap()
    }

    fn month(m: u32) -> MonthTarget {
        MonthTarget::new(2024, m).unwrap()
    }

    fn frame_at(m: u32) -> MonthFrame {
        let mut frame = TickFrame::new(vec!["Bid".to_string()]);
        let ts = Utc.with_ymd_and_hms(2024, m, 2, 0, 0, 0).unwrap();
        frame.push(Row::new(ts, vec![Value::Float(1.0)]));
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

    #[test]
    fn test_assemble_partial() {
        let mut report = BatchReport::new();
        report.extend([Err(failure_at(3)), Ok(frame_at(2)), Err(failure_at(1))]);

        let download = TickArchive::assemble(Pair::new("EURUSD"), range(), report).unwrap();
        assert_eq!(download.months, [month(1), month(2), month(3)]);
        assert_eq!(download.frame.len(), 1);
        assert_eq!(download.failures.len(), 2);
        assert!(!download.is_complete());
        assert_eq!(download.succeeded().collect::<Vec<_>>(), [month(2)]);
    }

    #[test]
    fn test_assemble_no_data() {
        let mut report = BatchReport::new();
        report.extend([Err(failure_at(1)), Err(failure_at(2)), Err(failure_at(3))]);

        let err = TickArchive::assemble(Pair::new("EURUSD"), range(), report).unwrap_err();
        assert!(matches!(
            err,
            ExfinError::NoData {
                attempted: 3,
                failures: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_layout_of_config() {
        let config = ClientConfig::default().with_base_url("http://localhost/ticks/");
        let layout = layout_of(&config);
        assert_eq!(layout.listing_url(), "http://localhost/ticks/");
    }
}
