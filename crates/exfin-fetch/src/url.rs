//! Archive URL and entry name construction.

use exfin_types::{MonthTarget, Pair};

/// Base URL of the public tick archive.
pub const BASE_URL: &str = "https://ticks.ex2archive.com/ticks";

/// File name prefix used by the public tick archive.
pub const FILE_PREFIX: &str = "Exness_";

/// Naming scheme of a tick archive.
///
/// Archive URL format:
/// `{base}/{PAIR}/{YEAR}/{MM}/{prefix}{PAIR}_{YEAR}_{MM}.zip`, with the
/// embedded table named `{prefix}{PAIR}_{YEAR}_{MM}.csv`.
///
/// # Example
///
/// ```
/// use exfin_fetch::url::ArchiveLayout;
/// use exfin_types::{MonthTarget, Pair};
///
/// let layout = ArchiveLayout::new("https://ticks.ex2archive.com/ticks/", "Exness_");
/// let month = MonthTarget::new(2024, 1).unwrap();
/// assert_eq!(
///     layout.archive_url(&Pair::new("eurusd"), month),
///     "https://ticks.ex2archive.com/ticks/EURUSD/2024/01/Exness_EURUSD_2024_01.zip"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    base_url: String,
    file_prefix: String,
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::new(BASE_URL, FILE_PREFIX)
    }
}

impl ArchiveLayout {
    /// Creates a layout. Trailing slashes on the base URL are dropped.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>, file_prefix: impl Into<String>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            file_prefix: file_prefix.into(),
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the URL of the pair listing.
    #[must_use]
    pub fn listing_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// Returns the file stem shared by an archive and its entry.
    #[must_use]
    pub fn file_stem(&self, pair: &Pair, month: MonthTarget) -> String {
        format!(
            "{}{}_{}_{:02}",
            self.file_prefix,
            pair,
            month.year(),
            month.month()
        )
    }

    /// Returns the URL of one month's archive.
    #[must_use]
    pub fn archive_url(&self, pair: &Pair, month: MonthTarget) -> String {
        format!(
            "{}/{}/{}/{:02}/{}.zip",
            self.base_url,
            pair,
            month.year(),
            month.month(),
            self.file_stem(pair, month)
        )
    }

    /// Returns the name of the table entry inside one month's archive.
    #[must_use]
    pub fn entry_name(&self, pair: &Pair, month: MonthTarget) -> String {
        format!("{}.csv", self.file_stem(pair, month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32) -> MonthTarget {
        MonthTarget::new(year, month).unwrap()
    }

    #[test]
    fn test_archive_url_pads_month() {
        let layout = ArchiveLayout::default();
        assert_eq!(
            layout.archive_url(&Pair::new("gbpusd"), month(2023, 7)),
            "https://ticks.ex2archive.com/ticks/GBPUSD/2023/07/Exness_GBPUSD_2023_07.zip"
        );
    }

    #[test]
    fn test_archive_url_without_prefix() {
        let layout = ArchiveLayout::new("http://localhost/base", "");
        assert_eq!(
            layout.archive_url(&Pair::new("XAUUSD"), month(2024, 12)),
            "http://localhost/base/XAUUSD/2024/12/XAUUSD_2024_12.zip"
        );
        assert_eq!(
            layout.entry_name(&Pair::new("XAUUSD"), month(2024, 12)),
            "XAUUSD_2024_12.csv"
        );
    }

    #[test]
    fn test_entry_name() {
        let layout = ArchiveLayout::default();
        assert_eq!(
            layout.entry_name(&Pair::new("EURUSD"), month(2024, 3)),
            "Exness_EURUSD_2024_03.csv"
        );
    }

    #[test]
    fn test_listing_url() {
        assert_eq!(
            ArchiveLayout::default().listing_url(),
            "https://ticks.ex2archive.com/ticks/"
        );
        assert_eq!(
            ArchiveLayout::new("http://x/ticks///", "").listing_url(),
            "http://x/ticks/"
        );
    }
}
