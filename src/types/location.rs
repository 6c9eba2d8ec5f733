//! The point and the period a weather series is requested for.

use crate::error::AidWeatherError;
use crate::types::period::AnyDate;
use chrono::NaiveDate;
use std::fmt;

/// A named geographical point.
///
/// Latitude must lie within `-90..=90` and longitude within `-180..=180`;
/// both are checked once, at construction, and the value is immutable afterwards.
///
/// # Examples
///
/// ```
/// use aidweather::Location;
///
/// let lisbon = Location::new("Lisbon", 38.6949, -9.3520).unwrap();
/// assert_eq!(lisbon.name(), "Lisbon");
/// assert!(Location::new("Nowhere", 91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, AidWeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AidWeatherError::InvalidLocation {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            name: name.into(),
            latitude,
            longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}, {}", self.name, self.latitude, self.longitude)
    }
}

/// An inclusive range of calendar days, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TimeRange {
    /// Creates a range from two dates.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::InvalidTimeRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AidWeatherError> {
        if start > end {
            return Err(AidWeatherError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from any two [`AnyDate`] bounds, taking the first day of
    /// `start` and the last day of `end`.
    ///
    /// ```
    /// use aidweather::{TimeRange, Year};
    ///
    /// let range = TimeRange::between("2020-01-01", Year(2020)).unwrap();
    /// assert_eq!(range.num_days(), 366);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::DateParsing`] if a bound cannot be resolved and
    /// [`AidWeatherError::InvalidTimeRange`] if the resolved start is after the end.
    pub fn between(start: impl AnyDate, end: impl AnyDate) -> Result<Self, AidWeatherError> {
        let start = start
            .get_date_range()
            .ok_or(AidWeatherError::DateParsing)?
            .start;
        let end = end.get_date_range().ok_or(AidWeatherError::DateParsing)?.end;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Month;

    #[test]
    fn test_location_rejects_out_of_range_coordinates() {
        assert!(Location::new("ok", -90.0, 180.0).is_ok());
        assert!(matches!(
            Location::new("bad", 10.0, -181.0),
            Err(AidWeatherError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn test_time_range_requires_ordered_bounds() {
        let a = NaiveDate::from_ymd_opt(2020, 1, 31).unwrap();
        let b = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(matches!(
            TimeRange::new(a, b),
            Err(AidWeatherError::InvalidTimeRange { .. })
        ));
        let single = TimeRange::new(a, a).unwrap();
        assert_eq!(single.num_days(), 1);
    }

    #[test]
    fn test_time_range_between_resolves_periods() -> Result<(), AidWeatherError> {
        let range = TimeRange::between(Month(2020, 1), Month(2020, 1))?;
        assert_eq!(range.num_days(), 31);
        assert_eq!(range.days().count(), 31);
        assert!(range.contains(NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap()));
        assert!(matches!(
            TimeRange::between("not a date", "2020-01-01"),
            Err(AidWeatherError::DateParsing)
        ));
        Ok(())
    }
}
