use crate::error::AidWeatherError;
use crate::table::columns::{require_column, DATE_COLUMN};
use crate::table::observation_table::ObservationTable;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::{col, lit, DataType, IntoLazy, LazyFrame};

/// An inclusive value bound on one column: keep rows with `low <= value <= high`.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub column: String,
    pub low: f64,
    pub high: f64,
}

impl Threshold {
    pub fn new(column: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            column: column.into(),
            low,
            high,
        }
    }
}

pub trait DateWindowExt {
    /// Keeps rows whose `date` lies in `[start, end]` (inclusive).
    /// Assumes the `date` column holds polars `Date` values.
    fn filter_date_window(self, start: NaiveDate, end: NaiveDate) -> LazyFrame;

    /// Keeps rows where `column` lies in `[low, high]`. Null values never match.
    fn filter_threshold(self, column: &str, low: f64, high: f64) -> LazyFrame;
}

impl DateWindowExt for LazyFrame {
    fn filter_date_window(self, start: NaiveDate, end: NaiveDate) -> LazyFrame {
        self.filter(
            col(DATE_COLUMN)
                .cast(DataType::Date)
                .gt_eq(lit(start))
                .and(col(DATE_COLUMN).cast(DataType::Date).lt_eq(lit(end))),
        )
    }

    fn filter_threshold(self, column: &str, low: f64, high: f64) -> LazyFrame {
        self.filter(
            col(column)
                .cast(DataType::Float64)
                .gt_eq(lit(low))
                .and(col(column).cast(DataType::Float64).lt_eq(lit(high))),
        )
    }
}

/// Restricts `table` to a date window and to every threshold, keeping row order.
///
/// A missing `start` or `end` defaults to the table's own first or last date.
///
/// # Errors
///
/// Returns [`AidWeatherError::ColumnNotFound`] if a threshold names a column the
/// table does not have.
pub fn filter_table(
    table: &ObservationTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    thresholds: &[Threshold],
) -> Result<ObservationTable, AidWeatherError> {
    require_column(table.frame(), DATE_COLUMN)?;
    for threshold in thresholds {
        require_column(table.frame(), &threshold.column)?;
    }

    let Some((first, last)) = table.date_span()? else {
        return Ok(table.clone());
    };
    let start = start.unwrap_or(first);
    let end = end.unwrap_or(last);

    let mut lazy = table.frame().clone().lazy().filter_date_window(start, end);
    for threshold in thresholds {
        lazy = lazy.filter_threshold(&threshold.column, threshold.low, threshold.high);
    }
    let frame = lazy.collect()?;

    debug!(
        "Filtered {} rows down to {} ({} to {}, {} thresholds)",
        table.height(),
        frame.height(),
        start,
        end,
        thresholds.len()
    );
    Ok(table.with_frame(frame))
}
