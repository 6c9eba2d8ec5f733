//! Calendar periods accepted as date bounds, and the month/quarter arithmetic
//! behind the resampling frequencies.

use crate::types::location::TimeRange;
use chrono::{Datelike, Months, NaiveDate};
use std::fmt;

/// A calendar year, e.g. `TimeRange::between(Year(2019), Year(2020))`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A month of a given year, stored as `Month(year, month)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn new(month: u32, year: i32) -> Self {
        Self(year, month)
    }

    pub fn year(self) -> i32 {
        self.0
    }

    pub fn month(self) -> u32 {
        self.1
    }

    /// `None` if the month number is not 1 to 12.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, self.1, 1)
    }

    pub fn last_day(self) -> Option<NaiveDate> {
        self.first_day()?
            .checked_add_months(Months::new(1))?
            .pred_opt()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

/// First and last day, both inclusive, covered by a date-like value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Anything that resolves to a span of calendar days.
///
/// Used for the bounds of [`TimeRange::between`]: a start bound takes the
/// first day of the span, an end bound the last one. So `Year(2023)` as an
/// end bound means 2023-12-31.
pub trait AnyDate {
    fn get_date_range(self) -> Option<DateBounds>;
}

impl AnyDate for NaiveDate {
    fn get_date_range(self) -> Option<DateBounds> {
        Some(DateBounds {
            start: self,
            end: self,
        })
    }
}

impl AnyDate for &str {
    fn get_date_range(self) -> Option<DateBounds> {
        // ISO dates as well as the service's compact form
        NaiveDate::parse_from_str(self, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(self, "%Y%m%d"))
            .ok()?
            .get_date_range()
    }
}

impl AnyDate for String {
    fn get_date_range(self) -> Option<DateBounds> {
        self.as_str().get_date_range()
    }
}

impl AnyDate for Year {
    fn get_date_range(self) -> Option<DateBounds> {
        Some(DateBounds {
            start: Month(self.0, 1).first_day()?,
            end: Month(self.0, 12).last_day()?,
        })
    }
}

impl AnyDate for Month {
    fn get_date_range(self) -> Option<DateBounds> {
        Some(DateBounds {
            start: self.first_day()?,
            end: self.last_day()?,
        })
    }
}

impl AnyDate for TimeRange {
    fn get_date_range(self) -> Option<DateBounds> {
        Some(DateBounds {
            start: self.start(),
            end: self.end(),
        })
    }
}

/// Last day of the month containing `date`.
pub(crate) fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    Month(date.year(), date.month()).last_day()
}

/// Last day of the calendar quarter containing `date`.
pub(crate) fn end_of_quarter(date: NaiveDate) -> Option<NaiveDate> {
    Month(date.year(), date.month0() / 3 * 3 + 3).last_day()
}
