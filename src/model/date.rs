use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};

/// Earliest year a task can be filed under.
pub const MIN_YEAR: i32 = 1;
/// Latest year a task can be filed under (keys stay four digits).
pub const MAX_YEAR: i32 = 9999;

/// Error type for turning user input into a calendar date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    Format(String),
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    NotACalendarDate { year: i32, month: u32, day: u32 },
    #[error("year {0} is outside {MIN_YEAR}..={MAX_YEAR}")]
    YearOutOfRange(i32),
}

/// A validated calendar date used to address the task store.
///
/// Construction is the only place calendar validity (month length, leap
/// years, year range) is checked. The store trusts the keys derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskDate(NaiveDate);

impl TaskDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(DateError::NotACalendarDate { year, month, day })?;
        Self::from_naive(date)
    }

    pub fn from_naive(date: NaiveDate) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(DateError::YearOutOfRange(date.year()));
        }
        Ok(TaskDate(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Store keys for this date, in canonical base-10 form.
    pub fn keys(&self) -> (String, String, String) {
        (
            self.year().to_string(),
            self.month().to_string(),
            self.day().to_string(),
        )
    }
}

/// English name of a month number, if it is one.
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

impl FromStr for TaskDate {
    type Err = DateError;

    /// Parse `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DateError::Format(s.to_string()));
        };
        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(y) || !all_digits(m) || !all_digits(d) {
            return Err(DateError::Format(s.to_string()));
        }
        let parse_err = |_| DateError::Format(s.to_string());
        let year: i32 = y.parse().map_err(parse_err)?;
        let month: u32 = m.parse().map_err(parse_err)?;
        let day: u32 = d.parse().map_err(parse_err)?;
        TaskDate::new(year, month, day)
    }
}

impl fmt::Display for TaskDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
