//! Fetching and parsing a single month's archive.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use exfin_types::{MonthTarget, Pair, TickFrame};

use crate::url::ArchiveLayout;
use crate::{ExtractError, ParseError, Transport, extract_entry, extract_to_dir, parse_frame};

/// Stage at which a month failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Request failed or returned a non-success status.
    Network,
    /// The archive was unreadable, lacked its entry, or could not be saved.
    Extraction,
    /// The entry was not a valid timestamp-indexed table.
    Parsing,
}

impl FailureKind {
    /// Returns the kind as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Extraction => "extraction",
            Self::Parsing => "parsing",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure of one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthFailure {
    /// The month that failed.
    pub month: MonthTarget,
    /// Where it failed.
    pub kind: FailureKind,
    /// The underlying cause.
    pub cause: String,
}

impl std::fmt::Display for MonthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} error: {}", self.month, self.kind, self.cause)
    }
}

/// The parsed table of one month.
#[derive(Debug, Clone)]
pub struct MonthFrame {
    /// The month fetched.
    pub month: MonthTarget,
    /// Its rows.
    pub frame: TickFrame,
}

/// Outcome of fetching one month.
pub type MonthOutcome = Result<MonthFrame, MonthFailure>;

/// Downloads, extracts and parses monthly archives.
#[derive(Debug, Clone)]
pub struct MonthFetcher {
    transport: Arc<dyn Transport>,
    layout: ArchiveLayout,
    save_path: Option<PathBuf>,
}

impl MonthFetcher {
    /// Creates a fetcher that parses archives in memory.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, layout: ArchiveLayout) -> Self {
        Self {
            transport,
            layout,
            save_path: None,
        }
    }

    /// Extracts archives into `dir` and parses the table from disk.
    #[must_use]
    pub fn with_save_path(mut self, dir: Option<PathBuf>) -> Self {
        self.save_path = dir;
        self
    }

    /// Returns the archive layout.
    #[must_use]
    pub const fn layout(&self) -> &ArchiveLayout {
        &self.layout
    }

    /// Returns the extraction directory, if any.
    #[must_use]
    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    /// Fetches and parses one month.
    ///
    /// Every failure is logged and returned as a classified
    /// [`MonthFailure`]; nothing is retried.
    pub async fn fetch_month(&self, pair: &Pair, month: MonthTarget) -> MonthOutcome {
        let url = self.layout.archive_url(pair, month);
        tracing::info!(%pair, %month, %url, "downloading");

        let body = match self.transport.get(&url).await {
            Ok(body) => body,
            Err(e) => return Err(fail(pair, month, FailureKind::Network, e.to_string())),
        };

        let entry = self.layout.entry_name(pair, month);
        let save_path = self.save_path.clone();
        let task = tokio::task::spawn_blocking(move || {
            extract_and_parse(&body, &entry, save_path.as_deref())
        });

        match task.await {
            Ok(Ok(frame)) => {
                tracing::debug!(%pair, %month, rows = frame.len(), "parsed month");
                Ok(MonthFrame { month, frame })
            }
            Ok(Err(e)) => Err(fail(pair, month, e.kind(), e.to_string())),
            Err(e) => Err(fail(
                pair,
                month,
                FailureKind::Parsing,
                format!("spawn_blocking failed: {e}"),
            )),
        }
    }
}

fn fail(pair: &Pair, month: MonthTarget, kind: FailureKind, cause: String) -> MonthFailure {
    tracing::error!(%pair, %month, %kind, error = %cause, "month failed");
    MonthFailure { month, kind, cause }
}

#[derive(Debug, thiserror::Error)]
enum UnitError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to reopen extracted file: {0}")]
    Reopen(std::io::Error),
}

impl UnitError {
    const fn kind(&self) -> FailureKind {
        match self {
            Self::Extract(_) => FailureKind::Extraction,
            Self::Parse(_) | Self::Reopen(_) => FailureKind::Parsing,
        }
    }
}

/// Locates the entry and parses it, going through disk when a save path
/// is configured.
fn extract_and_parse(
    body: &[u8],
    entry: &str,
    save_path: Option<&Path>,
) -> Result<TickFrame, UnitError> {
    let frame = match save_path {
        Some(dir) => {
            let path = extract_to_dir(body, entry, dir)?;
            let file = File::open(path).map_err(UnitError::Reopen)?;
            parse_frame(BufReader::new(file))?
        }
        None => {
            let contents = extract_entry(body, entry)?;
            parse_frame(contents.as_slice())?
        }
    };
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DownloadError;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    #[derive(Debug)]
    struct Fixed(Result<Bytes, u16>);

    #[async_trait]
    impl Transport for Fixed {
        async fn get(&self, _url: &str) -> Result<Bytes, DownloadError> {
            self.0
                .clone()
                .map_err(|status| DownloadError::Status { status })
        }
    }

    fn zip_of(name: &str, body: &str) -> Bytes {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    fn fetcher(response: Result<Bytes, u16>) -> MonthFetcher {
        MonthFetcher::new(Arc::new(Fixed(response)), ArchiveLayout::new("http://test", ""))
    }

    fn jan() -> MonthTarget {
        MonthTarget::new(2024, 1).unwrap()
    }

    const TABLE: &str = "Timestamp,Bid,Ask\n2024-01-02 00:00:00Z,1.1,1.2\n";

    #[tokio::test]
    async fn test_fetch_month_success() {
        let fetcher = fetcher(Ok(zip_of("EURUSD_2024_01.csv", TABLE)));
        let month = fetcher.fetch_month(&Pair::new("EURUSD"), jan()).await.unwrap();
        assert_eq!(month.month, jan());
        assert_eq!(month.frame.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_month_network_failure() {
        let fetcher = fetcher(Err(404));
        let failure = fetcher
            .fetch_month(&Pair::new("EURUSD"), jan())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Network);
        assert!(failure.cause.contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_month_missing_entry() {
        let fetcher = fetcher(Ok(zip_of("something_else.csv", TABLE)));
        let failure = fetcher
            .fetch_month(&Pair::new("EURUSD"), jan())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Extraction);
    }

    #[tokio::test]
    async fn test_fetch_month_parse_failure() {
        let fetcher = fetcher(Ok(zip_of("EURUSD_2024_01.csv", "Bid,Ask\n1,2\n")));
        let failure = fetcher
            .fetch_month(&Pair::new("EURUSD"), jan())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Parsing);
    }

    #[tokio::test]
    async fn test_fetch_month_duplicate_header_is_parse_failure() {
        let table = "Timestamp,Bid,Bid\n2024-01-02 00:00:00Z,1.1,1.2\n";
        let fetcher = fetcher(Ok(zip_of("EURUSD_2024_01.csv", table)));
        let failure = fetcher
            .fetch_month(&Pair::new("EURUSD"), jan())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Parsing);
        assert!(failure.cause.contains("Duplicate column 'Bid'"));
    }

    #[tokio::test]
    async fn test_fetch_month_saves_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = fetcher(Ok(zip_of("EURUSD_2024_01.csv", TABLE)))
            .with_save_path(Some(dir.path().to_path_buf()));

        let month = fetcher.fetch_month(&Pair::new("EURUSD"), jan()).await.unwrap();
        assert_eq!(month.frame.len(), 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("EURUSD_2024_01.csv")).unwrap(),
            TABLE
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = MonthFailure {
            month: jan(),
            kind: FailureKind::Extraction,
            cause: "Entry 'x' not found in archive".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "2024-01 extraction error: Entry 'x' not found in archive"
        );
    }
}
