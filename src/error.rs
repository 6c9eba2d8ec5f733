use crate::acquisition::error::AcquisitionError;
use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AidWeatherError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error("Date key '{0}' is not a valid YYYYMMDD calendar date")]
    Format(String),

    #[error("Failed to resolve date bound")]
    DateParsing,

    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("Unrecognized resampling frequency '{0}'")]
    InvalidFrequency(String),

    #[error("Unrecognized aggregation function '{0}'")]
    InvalidAggregation(String),

    #[error("Trend for column '{column}' needs at least two distinct dates, found {found}")]
    RegressionInput { column: String, found: usize },

    #[error("Rolling window size must be at least 1")]
    InvalidWindow,

    #[error("Coordinate ({lat}, {lon}) is outside the valid latitude/longitude range")]
    InvalidLocation { lat: f64, lon: f64 },

    #[error("Start date {start} is after end date {end}")]
    InvalidTimeRange { start: NaiveDate, end: NaiveDate },

    #[error("Failed to read config file '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config")]
    ConfigParse(#[source] serde_json::Error),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
