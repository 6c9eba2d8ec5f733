//! Conversions between polars columns and plain Rust values.

use crate::error::AidWeatherError;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Name of the date column every table carries.
pub const DATE_COLUMN: &str = "date";

// Polars stores dates as days since 1970-01-01; chrono counts from 0001-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Builds a polars `Date` column from chrono dates.
pub fn date_column(name: &str, dates: &[NaiveDate]) -> PolarsResult<Column> {
    let days: Vec<i32> = dates.iter().copied().map(date_to_epoch_days).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(Column::from(series))
}

/// Reads a date-like column (`Date`, `Datetime` or ISO `YYYY-MM-DD` strings).
pub(crate) fn column_dates(column: &Column) -> Result<Vec<Option<NaiveDate>>, AidWeatherError> {
    let series = column.as_materialized_series();
    if series.dtype() == &DataType::String {
        return series
            .str()?
            .into_iter()
            .map(|value| match value {
                None => Ok(None),
                Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| AidWeatherError::Format(text.to_string())),
            })
            .collect();
    }
    let days = series.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    let dates = days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(epoch_days_to_date))
        .collect();
    Ok(dates)
}

/// Reads a numeric column as `f64`, nulls preserved.
pub(crate) fn column_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

/// Reads any column as display text, nulls preserved.
pub(crate) fn column_text(column: &Column) -> PolarsResult<Vec<Option<String>>> {
    let series = column.as_materialized_series().cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();
    Ok(values)
}

/// Looks up a column, mapping absence to [`AidWeatherError::ColumnNotFound`].
pub(crate) fn require_column<'a>(
    frame: &'a DataFrame,
    name: &str,
) -> Result<&'a Column, AidWeatherError> {
    frame
        .column(name)
        .map_err(|_| AidWeatherError::ColumnNotFound(name.to_string()))
}
