//! Month keys and calendar-month arithmetic.
//!
//! Every ledger in this crate is indexed by calendar month. A [`MonthKey`]
//! renders as `YYYY-MM` and orders chronologically, so it can be used
//! directly as a map key or compared against another month.

use chrono::{DateTime, Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, ValuationError};

/// calendar month, stored as the first day of that month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey(NaiveDate);

impl MonthKey {
    /// create from year and month (1-12)
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(MonthKey)
            .ok_or_else(|| ValuationError::InvalidDate {
                message: format!("no such month: {}-{:02}", year, month),
            })
    }

    /// month containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        MonthKey(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// date within this month, clamped to the month's last day
    pub fn day(&self, day: u32) -> NaiveDate {
        let mut day = day.clamp(1, 31);
        loop {
            if let Some(date) = self.0.with_day(day) {
                return date;
            }
            day -= 1;
        }
    }

    /// following month, `None` past the end of the calendar
    pub fn succ_opt(&self) -> Option<Self> {
        self.add_months(1)
    }

    pub fn add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(MonthKey)
    }

    /// signed number of months from `self` to `other`
    pub fn months_until(&self, other: MonthKey) -> i32 {
        (other.year() - self.year()) * 12 + (other.month() as i32 - self.month() as i32)
    }

    /// iterate from `self` through `end`, inclusive
    pub fn iter_through(&self, end: MonthKey) -> MonthRange {
        MonthRange {
            next: Some(*self),
            end,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthKey {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ValuationError::InvalidDate {
            message: format!("expected YYYY-MM, got '{}'", s),
        };

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        MonthKey::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = ValuationError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// inclusive range of calendar months
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: Option<MonthKey>,
    end: MonthKey,
}

impl Iterator for MonthRange {
    type Item = MonthKey;

    fn next(&mut self) -> Option<MonthKey> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.succ_opt();
        Some(current)
    }
}

/// `YYYY-MM` key for a date
pub fn month_key(date: NaiveDate) -> String {
    MonthKey::from_date(date).to_string()
}

/// calendar months from `start` to `end`, ignoring the day of month
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    MonthKey::from_date(start).months_until(MonthKey::from_date(end))
}

/// add whole years, clamping Feb 29 to Feb 28
pub fn add_years(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years * 12))
}

/// parse a date crossing the record boundary.
///
/// Accepted formats are ISO `YYYY-MM-DD`, RFC 3339 timestamps and
/// `DD/MM/YYYY`. Anything else is rejected rather than guessed at.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%d/%m/%Y") {
        return Ok(date);
    }

    Err(ValuationError::InvalidDate {
        message: format!("unrecognised date format: '{}'", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_key_format() {
        assert_eq!(month_key(date(2024, 3, 17)), "2024-03");
        assert_eq!(MonthKey::new(987, 11).unwrap().to_string(), "0987-11");
    }

    #[test]
    fn test_month_key_parse() {
        let key: MonthKey = "2024-06".parse().unwrap();
        assert_eq!((key.year(), key.month()), (2024, 6));

        assert!("2024-13".parse::<MonthKey>().is_err());
        assert!("2024/06".parse::<MonthKey>().is_err());
        assert!("24-06".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(date(2023, 1, 31), date(2023, 3, 1)), 2);
        assert_eq!(months_between(date(2023, 11, 15), date(2024, 2, 15)), 3);
        assert_eq!(months_between(date(2024, 5, 1), date(2024, 2, 1)), -3);
    }

    #[test]
    fn test_iteration_crosses_year() {
        let start = MonthKey::new(2023, 11).unwrap();
        let end = MonthKey::new(2024, 2).unwrap();

        let months: Vec<String> = start.iter_through(end).map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    }

    #[test]
    fn test_empty_iteration_when_reversed() {
        let start = MonthKey::new(2024, 5).unwrap();
        let end = MonthKey::new(2024, 4).unwrap();
        assert_eq!(start.iter_through(end).count(), 0);
    }

    #[test]
    fn test_day_clamps_to_month_end() {
        let feb = MonthKey::new(2023, 2).unwrap();
        assert_eq!(feb.day(31), date(2023, 2, 28));
        assert_eq!(feb.day(5), date(2023, 2, 5));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-06-05").unwrap(), date(2024, 6, 5));
        assert_eq!(parse_date("05/06/2024").unwrap(), date(2024, 6, 5));
        assert_eq!(parse_date("2024-06-05T10:30:00Z").unwrap(), date(2024, 6, 5));
        assert!(parse_date("June 5th").is_err());
        assert!(parse_date("06-05-2024").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::new(2024, 1).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-01\"");
        let parsed: MonthKey = serde_json::from_str("\"2024-01\"").unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_add_years_lock_in() {
        assert_eq!(add_years(date(2020, 2, 29), 15), Some(date(2035, 2, 28)));
    }
}
