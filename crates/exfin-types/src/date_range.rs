//! Date range and month iteration.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DateRangeError;

/// Date format accepted for range bounds.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A range of dates for data retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a date range for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates a range from an optional end date, defaulting the end to
    /// today (UTC) when omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if start is after the resolved end.
    pub fn from_dates(start: NaiveDate, end: Option<NaiveDate>) -> Result<Self, DateRangeError> {
        Self::new(start, end.unwrap_or_else(|| Utc::now().date_naive()))
    }

    /// Parses `YYYY-MM-DD` bounds, defaulting the end to today (UTC).
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is malformed or start is after end.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, DateRangeError> {
        Self::parse_with_today(start, end, Utc::now().date_naive())
    }

    /// Parses `YYYY-MM-DD` bounds against a pinned "today".
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is malformed or start is after end.
    pub fn parse_with_today(
        start: &str,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, DateRangeError> {
        let start = parse_date(start)?;
        let end = match end {
            Some(s) => parse_date(s)?,
            None => today,
        };
        Self::new(start, end)
    }

    /// Returns an iterator over every calendar month intersecting the range.
    ///
    /// The sequence is strictly increasing and never empty. The months
    /// holding `start` and `end` are included even when the range covers
    /// only part of them, and each is fetched whole; a range ending today
    /// therefore requests the current month, which the archive may not
    /// have published yet.
    #[must_use]
    pub fn months(&self) -> MonthIterator {
        MonthIterator::new(
            MonthTarget::containing(self.start),
            MonthTarget::containing(self.end),
        )
    }

    /// Returns the number of months intersecting the range.
    #[must_use]
    pub fn total_months(&self) -> usize {
        self.months().len()
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        DateRangeError::InvalidDate {
            input: input.to_string(),
        }
    })
}

/// One monthly archive to fetch, identified by its calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthTarget {
    first_day: NaiveDate,
}

impl MonthTarget {
    /// Creates a month target, returning `None` for an invalid month.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first_day| Self { first_day })
    }

    /// Returns the month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date - Days::new(u64::from(date.day0())),
        }
    }

    /// Returns the calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    /// Returns the calendar month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    /// Returns the first day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Returns the last day of the month.
    #[must_use]
    pub fn month_end(&self) -> NaiveDate {
        self.next()
            .and_then(|next| next.first_day.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Returns midnight UTC of the last day of the month.
    #[must_use]
    pub fn month_end_timestamp(&self) -> DateTime<Utc> {
        self.month_end().and_time(NaiveTime::MIN).and_utc()
    }

    /// Returns the following month, or `None` past the calendar limit.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        self.first_day
            .checked_add_months(Months::new(1))
            .map(|first_day| Self { first_day })
    }
}

impl std::fmt::Display for MonthTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Iterator over consecutive months.
#[derive(Debug, Clone)]
pub struct MonthIterator {
    current: Option<MonthTarget>,
    last: MonthTarget,
}

impl MonthIterator {
    /// Creates an iterator from `first` to `last`, both inclusive.
    const fn new(first: MonthTarget, last: MonthTarget) -> Self {
        Self {
            current: Some(first),
            last,
        }
    }
}

impl Iterator for MonthIterator {
    type Item = MonthTarget;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.filter(|month| *month <= self.last)?;
        self.current = current.next();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.current {
            Some(current) if current <= self.last => {
                let years = i64::from(self.last.year() - current.year());
                let months = i64::from(self.last.month()) - i64::from(current.month());
                (years * 12 + months + 1) as usize
            }
            _ => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MonthIterator {}
