use crate::error::AidWeatherError;
use crate::overlay::stats::least_squares;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Day number counted from 0001-01-01 (day 1), the x axis of every trend.
pub fn ordinal_day(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Least-squares line of a column's values against [`ordinal_day`].
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTrend {
    pub column: String,
    pub slope: f64,
    pub intercept: f64,
    /// Number of points the line was fitted on.
    pub points: usize,
}

impl RegressionTrend {
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        self.slope * ordinal_day(date) + self.intercept
    }
}

/// Fits `value = slope * ordinal_day(date) + intercept` over `points`.
///
/// # Errors
///
/// Returns [`AidWeatherError::RegressionInput`] if the points span fewer than
/// two distinct dates.
pub fn compute_trend(
    column: &str,
    points: &[(NaiveDate, f64)],
) -> Result<RegressionTrend, AidWeatherError> {
    let distinct = points.iter().map(|(d, _)| *d).collect::<BTreeSet<_>>().len();
    let not_enough = || AidWeatherError::RegressionInput {
        column: column.to_string(),
        found: distinct,
    };
    if distinct < 2 {
        return Err(not_enough());
    }

    let x: Vec<f64> = points.iter().map(|(d, _)| ordinal_day(*d)).collect();
    let y: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let (slope, intercept) = least_squares(&x, &y).ok_or_else(not_enough)?;
    Ok(RegressionTrend {
        column: column.to_string(),
        slope,
        intercept,
        points: points.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_ordinal_day_starts_at_one() {
        assert_eq!(ordinal_day(NaiveDate::from_ymd_opt(1, 1, 1).unwrap()), 1.0);
        assert_eq!(ordinal_day(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()), 737_425.0);
    }

    #[test]
    fn test_linear_series_is_recovered() -> Result<(), AidWeatherError> {
        let (a, b) = (0.3, -221_000.0);
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let points: Vec<(NaiveDate, f64)> = (0..60)
            .map(|i| {
                let d = start + Days::new(i * 3);
                (d, a * ordinal_day(d) + b)
            })
            .collect();
        let trend = compute_trend("height", &points)?;

        assert!((trend.slope - a).abs() < 1e-9);
        assert!((trend.intercept - b).abs() < 1e-3);
        assert_eq!(trend.points, 60);
        assert!((trend.value_at(start) - points[0].1).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_single_date_cannot_be_fitted() {
        let d = NaiveDate::from_ymd_opt(2020, 5, 5).unwrap();
        let result = compute_trend("height", &[(d, 1.0), (d, 2.0)]);
        assert!(matches!(
            result,
            Err(AidWeatherError::RegressionInput { found: 1, .. })
        ));
    }
}
