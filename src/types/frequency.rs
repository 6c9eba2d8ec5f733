//! Calendar frequencies used to bucket daily rows for aggregation.

use crate::error::AidWeatherError;
use crate::types::period::{end_of_month, end_of_quarter};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

/// A calendar-aligned bucket size.
///
/// Every bucket is labelled by its anchor date: the last day of the bucket for
/// the `*End` and weekly variants, the first day for [`Frequency::MonthStart`].
/// Frequencies parse from the usual pandas-style aliases:
///
/// ```
/// use aidweather::Frequency;
/// use chrono::Weekday;
///
/// assert_eq!("ME".parse::<Frequency>().unwrap(), Frequency::MonthEnd);
/// assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::Weekly(Weekday::Sun));
/// assert_eq!("W-MON".parse::<Frequency>().unwrap(), Frequency::Weekly(Weekday::Mon));
/// assert!("fortnightly".parse::<Frequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// One bucket per day.
    Daily,
    /// Weeks ending on the given weekday (`W` alone ends on Sunday).
    Weekly(Weekday),
    /// Calendar months, labelled by their last day (`M`, `ME`).
    MonthEnd,
    /// Calendar months, labelled by their first day (`MS`).
    MonthStart,
    /// Calendar quarters, labelled by their last day (`Q`, `QE`).
    QuarterEnd,
    /// Calendar years, labelled by December 31st (`Y`, `YE`, `A`).
    YearEnd,
}

impl Frequency {
    /// The anchor date of the bucket that `date` falls into.
    pub(crate) fn bucket_label(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => Some(date),
            Frequency::Weekly(anchor) => {
                let ahead = (anchor.num_days_from_monday() + 7
                    - date.weekday().num_days_from_monday())
                    % 7;
                date.checked_add_days(Days::new(u64::from(ahead)))
            }
            Frequency::MonthEnd => end_of_month(date),
            Frequency::MonthStart => date.with_day(1),
            Frequency::QuarterEnd => end_of_quarter(date),
            Frequency::YearEnd => NaiveDate::from_ymd_opt(date.year(), 12, 31),
        }
    }
}

fn weekday_alias(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl FromStr for Frequency {
    type Err = AidWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alias = s.trim().to_ascii_uppercase();
        let frequency = match alias.as_str() {
            "D" => Frequency::Daily,
            "W" => Frequency::Weekly(Weekday::Sun),
            "M" | "ME" => Frequency::MonthEnd,
            "MS" => Frequency::MonthStart,
            "Q" | "QE" => Frequency::QuarterEnd,
            "Y" | "YE" | "A" => Frequency::YearEnd,
            other => {
                let weekday = other
                    .strip_prefix("W-")
                    .and_then(|day| day.parse::<Weekday>().ok())
                    .ok_or_else(|| AidWeatherError::InvalidFrequency(s.to_string()))?;
                Frequency::Weekly(weekday)
            }
        };
        Ok(frequency)
    }
}

/// Formats a `Frequency` as its canonical alias.
///
/// ```
/// use aidweather::Frequency;
/// use chrono::Weekday;
///
/// assert_eq!(Frequency::Weekly(Weekday::Wed).to_string(), "W-WED");
/// assert_eq!(Frequency::MonthEnd.to_string(), "ME");
/// ```
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => f.write_str("D"),
            Frequency::Weekly(day) => write!(f, "W-{}", weekday_alias(*day)),
            Frequency::MonthEnd => f.write_str("ME"),
            Frequency::MonthStart => f.write_str("MS"),
            Frequency::QuarterEnd => f.write_str("QE"),
            Frequency::YearEnd => f.write_str("YE"),
        }
    }
}
