//! The externally sourced table laid over the weather series.

use crate::error::AidWeatherError;
use crate::table::columns::{column_dates, column_text, column_values, require_column, DATE_COLUMN};
use crate::types::value_kind::ValueKind;
use chrono::NaiveDate;
use polars::prelude::DataFrame;

/// A table with a `date` column and any number of observation columns, where
/// several rows (replicates) may share a date.
///
/// Dates are parsed once here, from a `Date`/`Datetime` column or ISO
/// strings, and each column's [`ValueKind`] is fixed from its dtype unless
/// overridden with [`with_kind`](SecondaryTable::with_kind).
#[derive(Debug, Clone)]
pub struct SecondaryTable {
    frame: DataFrame,
    dates: Vec<Option<NaiveDate>>,
    kinds: Vec<(String, ValueKind)>,
}

impl SecondaryTable {
    /// # Errors
    ///
    /// Returns [`AidWeatherError::ColumnNotFound`] without a `date` column and
    /// [`AidWeatherError::Format`] for a date string that is not `YYYY-MM-DD`.
    pub fn new(frame: DataFrame) -> Result<Self, AidWeatherError> {
        let dates = column_dates(require_column(&frame, DATE_COLUMN)?)?;
        let kinds = frame
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != DATE_COLUMN)
            .map(|c| (c.name().to_string(), ValueKind::from_dtype(c.dtype())))
            .collect();
        Ok(Self {
            frame,
            dates,
            kinds,
        })
    }

    /// Overrides the kind of one column, e.g. to treat an integer code column
    /// as categorical.
    pub fn with_kind(mut self, column: &str, kind: ValueKind) -> Result<Self, AidWeatherError> {
        let entry = self
            .kinds
            .iter_mut()
            .find(|(name, _)| name == column)
            .ok_or_else(|| AidWeatherError::ColumnNotFound(column.to_string()))?;
        entry.1 = kind;
        Ok(self)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> Vec<String> {
        self.kinds.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn kind(&self, column: &str) -> Option<ValueKind> {
        self.kinds
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    /// Non-null `(date, value)` pairs of a numeric column, stably sorted by date.
    pub fn points(&self, column: &str) -> Result<Vec<(NaiveDate, f64)>, AidWeatherError> {
        let values = column_values(require_column(&self.frame, column)?)?;
        Ok(self.sorted_pairs(values))
    }

    /// Non-null `(date, text)` pairs of any column, stably sorted by date.
    pub fn labels(&self, column: &str) -> Result<Vec<(NaiveDate, String)>, AidWeatherError> {
        let values = column_text(require_column(&self.frame, column)?)?;
        Ok(self.sorted_pairs(values))
    }

    fn sorted_pairs<T>(&self, values: Vec<Option<T>>) -> Vec<(NaiveDate, T)> {
        let mut pairs: Vec<(NaiveDate, T)> = self
            .dates
            .iter()
            .zip(values)
            .filter_map(|(date, value)| Some(((*date)?, value?)))
            .collect();
        pairs.sort_by_key(|(date, _)| *date);
        pairs
    }
}
