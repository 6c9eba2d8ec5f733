//! Contains the `ObservationTable`, the date-indexed frame produced by an acquisition.

use crate::error::AidWeatherError;
use crate::table::columns::{column_dates, column_values, require_column, DATE_COLUMN};
use crate::types::parameter::NamingMap;
use crate::types::value_kind::ValueKind;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;

/// A polars `DataFrame` with a `date` column followed by one column per
/// parameter, each tagged with its [`ValueKind`].
///
/// Tables coming out of an acquisition have unique, strictly ascending dates
/// and one `Float64` column per requested parameter, in request order. Every
/// operation on a table returns a new one; nothing here mutates in place.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    frame: DataFrame,
    kinds: Vec<(String, ValueKind)>,
}

impl ObservationTable {
    pub(crate) fn from_parts(frame: DataFrame, kinds: Vec<(String, ValueKind)>) -> Self {
        Self { frame, kinds }
    }

    /// Wraps an existing frame, tagging each non-date column by its dtype.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::ColumnNotFound`] if the frame has no `date` column.
    pub fn from_frame(frame: DataFrame) -> Result<Self, AidWeatherError> {
        require_column(&frame, DATE_COLUMN)?;
        let kinds = frame
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != DATE_COLUMN)
            .map(|c| (c.name().to_string(), ValueKind::from_dtype(c.dtype())))
            .collect();
        Ok(Self { frame, kinds })
    }

    /// Same column tags, different rows. Used by the filters.
    pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            kinds: self.kinds.clone(),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns, the date column included.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Names of the non-date columns, in order.
    pub fn value_columns(&self) -> Vec<String> {
        self.kinds.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    pub fn kind(&self, column: &str) -> Option<ValueKind> {
        self.kinds
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    /// The date column as chrono dates.
    pub fn dates(&self) -> Result<Vec<NaiveDate>, AidWeatherError> {
        let column = require_column(&self.frame, DATE_COLUMN)?;
        Ok(column_dates(column)?.into_iter().flatten().collect())
    }

    /// Earliest and latest date, or `None` for an empty table.
    pub fn date_span(&self) -> Result<Option<(NaiveDate, NaiveDate)>, AidWeatherError> {
        let dates = self.dates()?;
        Ok(dates.iter().min().copied().zip(dates.iter().max().copied()))
    }

    /// One column's values as `f64`, nulls preserved.
    pub fn values(&self, column: &str) -> Result<Vec<Option<f64>>, AidWeatherError> {
        let column = require_column(&self.frame, column)?;
        Ok(column_values(column)?)
    }

    /// A copy with columns renamed through `naming`; codes without a label keep
    /// their name. The date column is never renamed.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::Polars`] if two columns end up with the same name.
    pub fn renamed(&self, naming: &NamingMap) -> Result<ObservationTable, AidWeatherError> {
        let mut frame = self.frame.clone();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| {
                let name = name.as_str();
                if name == DATE_COLUMN {
                    name.to_string()
                } else {
                    naming.label(name).to_string()
                }
            })
            .collect();
        frame.set_column_names(names.iter().map(String::as_str))?;
        let kinds = self
            .kinds
            .iter()
            .map(|(name, kind)| (naming.label(name).to_string(), *kind))
            .collect();
        debug!("Renamed {} columns using naming map", self.kinds.len());
        Ok(Self { frame, kinds })
    }
}

/// Tables are equal when their frames hold the same values (nulls matching
/// nulls) and their columns carry the same kinds.
impl PartialEq for ObservationTable {
    fn eq(&self, other: &Self) -> bool {
        self.kinds == other.kinds && self.frame.equals_missing(&other.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::columns::date_column;

    fn sample_table() -> ObservationTable {
        let dates = [
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        ];
        let frame = DataFrame::new(vec![
            date_column(DATE_COLUMN, &dates).unwrap(),
            Column::new("T2M".into(), vec![Some(10.5), None]),
            Column::new("RH2M".into(), vec![Some(80.0), Some(82.5)]),
        ])
        .unwrap();
        ObservationTable::from_frame(frame).unwrap()
    }

    #[test]
    fn test_from_frame_tags_columns() {
        let table = sample_table();
        assert_eq!(table.value_columns(), ["T2M", "RH2M"]);
        assert_eq!(table.kind("T2M"), Some(ValueKind::Continuous));
        assert_eq!(table.kind("date"), None);
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_from_frame_requires_date_column() {
        let frame = DataFrame::new(vec![Column::new("T2M".into(), vec![1.0])]).unwrap();
        assert!(matches!(
            ObservationTable::from_frame(frame),
            Err(AidWeatherError::ColumnNotFound(c)) if c == "date"
        ));
    }

    #[test]
    fn test_renamed_leaves_original_untouched() -> Result<(), AidWeatherError> {
        let table = sample_table();
        let naming: NamingMap = [("T2M", "Temperature")].into_iter().collect();
        let renamed = table.renamed(&naming)?;

        assert_eq!(renamed.value_columns(), ["Temperature", "RH2M"]);
        assert!(renamed.has_column("Temperature"));
        assert!(renamed.has_column("date"));
        assert!(table.has_column("T2M"));
        assert!(!table.has_column("Temperature"));
        assert_eq!(renamed.values("Temperature")?, vec![Some(10.5), None]);
        Ok(())
    }

    #[test]
    fn test_equality_treats_nulls_as_equal() {
        assert_eq!(sample_table(), sample_table());
    }
}
