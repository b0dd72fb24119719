//! Date windows used to select records, plus Gregorian calendar helpers.
//!
//! # Invariants
//! - Month windows only exist for years `2000..=2100` and months `1..=12`.
//! - A single-date filter always wins over a year/month filter.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejected window parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    YearOutOfRange(i32),
    MonthOutOfRange(u32),
    InvalidDate(String),
    /// Trailing trend longer than the supported span.
    TrendTooLong { days: u32, max: u32 },
}

impl Display for WindowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YearOutOfRange(year) => {
                write!(f, "year {year} is outside {MIN_YEAR}..={MAX_YEAR}")
            }
            Self::MonthOutOfRange(month) => write!(f, "month {month} is outside 1..=12"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
            Self::TrendTooLong { days, max } => {
                write!(f, "trend of {days} days exceeds the {max}-day maximum")
            }
        }
    }
}

impl Error for WindowError {}

/// Which records a query selects, keyed on the record's calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordWindow {
    /// Full history.
    All,
    Day { date: NaiveDate },
    Month { year: i32, month: u32 },
}

impl RecordWindow {
    pub fn day(date: NaiveDate) -> Self {
        Self::Day { date }
    }

    /// Validated month window.
    pub fn month(year: i32, month: u32) -> Result<Self, WindowError> {
        validate_year(year)?;
        validate_month(month)?;
        Ok(Self::Month { year, month })
    }

    /// Resolves optional request filters into a window.
    ///
    /// `date` takes precedence; a month window needs both `year` and `month`;
    /// with neither the window is the full history. Supplied values are
    /// range-checked even when they end up unused.
    pub fn from_params(
        date: Option<&str>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Self, WindowError> {
        if let Some(year) = year {
            validate_year(year)?;
        }
        if let Some(month) = month {
            validate_month(month)?;
        }

        if let Some(date) = date.map(str::trim).filter(|value| !value.is_empty()) {
            return parse_date(date).map(Self::day);
        }

        match (year, month) {
            (Some(year), Some(month)) => Ok(Self::Month { year, month }),
            _ => Ok(Self::All),
        }
    }

    /// Predicate over a record's calendar date.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Day { date: day } => day == date,
            Self::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

/// Parses a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, WindowError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| WindowError::InvalidDate(value.to_string()))
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Every calendar date of the month, ascending and gap-free.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

fn validate_year(year: i32) -> Result<(), WindowError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(WindowError::YearOutOfRange(year));
    }
    Ok(())
}

fn validate_month(month: u32) -> Result<(), WindowError> {
    if !(1..=12).contains(&month) {
        return Err(WindowError::MonthOutOfRange(month));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, is_leap_year, month_days, parse_date, RecordWindow, WindowError};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_years_follow_gregorian_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2026));
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test]
    fn month_days_is_dense_for_every_month() {
        for year in [2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let days = month_days(year, month);
                assert_eq!(days.len() as u32, days_in_month(year, month));
                assert_eq!(days[0], date(year, month, 1));
                for pair in days.windows(2) {
                    assert_eq!(pair[0].succ_opt(), Some(pair[1]));
                }
            }
        }
    }

    #[test]
    fn date_filter_takes_precedence_over_month() {
        let window = RecordWindow::from_params(Some("2026-02-17"), Some(2026), Some(3)).unwrap();
        assert_eq!(window, RecordWindow::day(date(2026, 2, 17)));
    }

    #[test]
    fn month_filter_requires_both_parts() {
        assert_eq!(
            RecordWindow::from_params(None, Some(2026), None).unwrap(),
            RecordWindow::All
        );
        assert_eq!(
            RecordWindow::from_params(None, Some(2026), Some(2)).unwrap(),
            RecordWindow::Month {
                year: 2026,
                month: 2
            }
        );
        assert_eq!(
            RecordWindow::from_params(Some(""), None, None).unwrap(),
            RecordWindow::All
        );
    }

    #[test]
    fn out_of_range_params_are_rejected() {
        assert_eq!(
            RecordWindow::month(1999, 5),
            Err(WindowError::YearOutOfRange(1999))
        );
        assert_eq!(
            RecordWindow::month(2026, 13),
            Err(WindowError::MonthOutOfRange(13))
        );
        assert_eq!(
            RecordWindow::from_params(Some("2026-02-17"), Some(2101), None),
            Err(WindowError::YearOutOfRange(2101))
        );
        assert!(matches!(
            parse_date("2026-02-30"),
            Err(WindowError::InvalidDate(_))
        ));
        assert!(parse_date("17/02/2026").is_err());
    }

    #[test]
    fn contains_matches_on_calendar_fields() {
        let month = RecordWindow::month(2026, 2).unwrap();
        assert!(month.contains(date(2026, 2, 28)));
        assert!(!month.contains(date(2025, 2, 28)));
        assert!(!month.contains(date(2026, 3, 1)));
        assert!(RecordWindow::All.contains(date(1990, 1, 1)));
    }
}
