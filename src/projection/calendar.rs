//! Calendar arithmetic for age and time-to-retirement
//!
//! Uses a simplified calendar where every year has exactly 365 days.
//! February 29 is never a valid date: parsing rejects it and the system
//! clock maps it to February 28.

use crate::error::{CalculatorError, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

pub const DAYS_PER_YEAR: u32 = 365;

/// Days elapsed before the first of each month in a non-leap year
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// A date on the 365-day calendar
///
/// Field order gives chronological `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Parse a `YYYY-MM-DD` string
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
            CalculatorError::validation("date", format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
        })?;
        Self::from_naive(parsed).ok_or_else(|| {
            CalculatorError::validation(
                "date",
                format!("'{}' falls on February 29, which the 365-day calendar does not have", value),
            )
        })
    }

    /// Build from year/month/day, rejecting anything outside the 365-day calendar
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(Self::from_naive)
            .ok_or_else(|| {
                CalculatorError::validation(
                    "date",
                    format!("{:04}-{:02}-{:02} is not a valid calendar date", year, month, day),
                )
            })
    }

    fn from_naive(date: NaiveDate) -> Option<Self> {
        if date.month() == 2 && date.day() == 29 {
            return None;
        }
        Some(Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        })
    }

    /// Current local date; a leap day reads as February 28
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        let day = if now.month() == 2 && now.day() == 29 { 28 } else { now.day() };
        Self {
            year: now.year(),
            month: now.month(),
            day,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Same month and day in another year. Always valid since Feb 29 cannot exist.
    pub fn with_year(&self, year: i32) -> Self {
        Self { year, ..*self }
    }

    /// Days since a fixed epoch, counting 365 days per year
    fn day_number(&self) -> i64 {
        self.year as i64 * DAYS_PER_YEAR as i64
            + DAYS_BEFORE_MONTH[(self.month - 1) as usize] as i64
            + self.day as i64
            - 1
    }

    /// Signed number of days from `self` to `later`
    pub fn days_until(&self, later: &CalendarDate) -> i64 {
        later.day_number() - self.day_number()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Resolve an optional "as of" date string.
///
/// `None` means today. An unparsable string also means today: the failure is
/// logged and otherwise swallowed, so callers get a best-effort answer rather
/// than an error.
pub fn resolve_as_of(as_of_date: Option<&str>) -> CalendarDate {
    match as_of_date {
        None => CalendarDate::today(),
        Some(raw) => match CalendarDate::parse(raw) {
            Ok(date) => date,
            Err(e) => {
                log::warn!("Ignoring as-of date, falling back to today: {}", e);
                CalendarDate::today()
            }
        },
    }
}

/// Whole years and leftover days until the retirement date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeToRetirement {
    pub years: i32,
    pub days: u32,
}

impl TimeToRetirement {
    pub const RETIRED: TimeToRetirement = TimeToRetirement { years: 0, days: 0 };
}

/// Age in whole years on `as_of`
pub fn age(date_of_birth: &CalendarDate, as_of: &CalendarDate) -> i32 {
    let birthday_this_year = date_of_birth.with_year(as_of.year);
    let mut age = as_of.year - date_of_birth.year;
    if birthday_this_year > *as_of {
        age -= 1;
    }
    age
}

/// Whole years from `as_of` to the retirement date plus the remaining days.
///
/// The year boundary is `as_of`'s month/day in the retirement year, pulled back
/// one more year when `as_of` is already past this year's birthday, so the
/// remainder is always under a year. Returns zero once retirement is reached.
pub fn time_until_retirement(
    date_of_birth: &CalendarDate,
    retirement_age: u32,
    as_of: &CalendarDate,
) -> TimeToRetirement {
    let years = i32::try_from(retirement_age).unwrap_or(i32::MAX);
    let retirement_date = date_of_birth.with_year(date_of_birth.year.saturating_add(years));
    if *as_of >= retirement_date {
        return TimeToRetirement::RETIRED;
    }

    let mut boundary = as_of.with_year(retirement_date.year);
    if *as_of > date_of_birth.with_year(as_of.year) {
        boundary = as_of.with_year(retirement_date.year - 1);
    }

    TimeToRetirement {
        years: boundary.year - as_of.year,
        days: boundary.days_until(&retirement_date) as u32,
    }
}
