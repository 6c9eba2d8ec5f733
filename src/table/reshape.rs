//! Pivots the service's parameter-major payload into a date-indexed table.

use crate::error::AidWeatherError;
use crate::table::columns::{date_column, DATE_COLUMN};
use crate::table::observation_table::ObservationTable;
use crate::types::location::TimeRange;
use crate::types::parameter::ParameterSet;
use crate::types::value_kind::ValueKind;
use chrono::NaiveDate;
use log::{debug, warn};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Parameter code → (`YYYYMMDD` date key → value), as returned by the service.
pub type RawObservationMap = BTreeMap<String, BTreeMap<String, Option<f64>>>;

/// Parses a fixed-width `YYYYMMDD` date key.
///
/// # Errors
///
/// Returns [`AidWeatherError::Format`] unless the key is exactly eight ASCII
/// digits forming a real calendar date.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, AidWeatherError> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AidWeatherError::Format(key.to_string()));
    }
    NaiveDate::parse_from_str(key, "%Y%m%d").map_err(|_| AidWeatherError::Format(key.to_string()))
}

/// Turns a [`RawObservationMap`] into an [`ObservationTable`].
///
/// The output has a `date` column (unique, ascending) and exactly one
/// `Float64` column per parameter of the set, in set order. A parameter
/// missing from the payload becomes an all-null column, values equal to the
/// fill value become nulls, and codes outside the set are ignored.
#[derive(Debug, Clone)]
pub struct TableReshaper {
    parameters: ParameterSet,
    fill_value: Option<f64>,
    window: Option<TimeRange>,
}

impl TableReshaper {
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parameters,
            fill_value: None,
            window: None,
        }
    }

    /// Values equal to `fill_value` are stored as nulls.
    pub fn with_fill_value(mut self, fill_value: Option<f64>) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Rows dated outside `window` are dropped.
    pub fn with_window(mut self, window: TimeRange) -> Self {
        self.window = Some(window);
        self
    }

    fn clean(&self, value: Option<f64>) -> Option<f64> {
        value.filter(|v| !v.is_nan() && Some(*v) != self.fill_value)
    }

    pub fn reshape(&self, raw: &RawObservationMap) -> Result<ObservationTable, AidWeatherError> {
        let width = self.parameters.len();
        let mut rows: BTreeMap<NaiveDate, Vec<Option<f64>>> = BTreeMap::new();
        let mut outside_window = 0usize;

        for (index, code) in self.parameters.iter().enumerate() {
            let Some(series) = raw.get(code) else {
                debug!("Parameter {} absent from payload, filling with nulls", code);
                continue;
            };
            for (key, value) in series {
                let date = parse_date_key(key)?;
                if self.window.is_some_and(|w| !w.contains(date)) {
                    outside_window += 1;
                    continue;
                }
                let row = rows.entry(date).or_insert_with(|| vec![None; width]);
                row[index] = self.clean(*value);
            }
        }

        for code in raw.keys().filter(|code| !self.parameters.contains(code)) {
            debug!("Ignoring unrequested parameter {} in payload", code);
        }
        if outside_window > 0 {
            warn!(
                "Dropped {} values dated outside the requested window",
                outside_window
            );
        }

        let dates: Vec<NaiveDate> = rows.keys().copied().collect();
        let mut columns = Vec::with_capacity(width + 1);
        columns.push(date_column(DATE_COLUMN, &dates)?);
        for (index, code) in self.parameters.iter().enumerate() {
            let values: Vec<Option<f64>> = rows.values().map(|row| row[index]).collect();
            columns.push(Column::new(code.into(), values));
        }
        let frame = DataFrame::new(columns)?;
        let kinds = self
            .parameters
            .iter()
            .map(|code| (code.to_string(), ValueKind::Continuous))
            .collect();

        debug!(
            "Reshaped {} parameters into {} rows",
            width,
            frame.height()
        );
        Ok(ObservationTable::from_parts(frame, kinds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entries: Vec<(&str, Vec<(&str, Option<f64>)>)>) -> RawObservationMap {
        entries
            .into_iter()
            .map(|(code, series)| {
                let series = series
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect();
                (code.to_string(), series)
            })
            .collect()
    }

    #[test]
    fn test_parse_date_key() {
        assert_eq!(
            parse_date_key("20200131").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 31).unwrap()
        );
        for bad in ["2020013", "2020-01-31", "20200231", "2020013a", "202001311"] {
            assert!(
                matches!(parse_date_key(bad), Err(AidWeatherError::Format(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_reshape_pivots_and_sorts() -> Result<(), AidWeatherError> {
        let raw = raw(vec![
            (
                "T2M",
                vec![("20200103", Some(3.0)), ("20200101", Some(1.0))],
            ),
            (
                "RH2M",
                vec![("20200102", Some(72.0)), ("20200101", Some(70.0))],
            ),
        ]);
        let params = ParameterSet::new(["T2M", "RH2M"])?;
        let table = TableReshaper::new(params).reshape(&raw)?;

        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 3);
        let dates = table.dates()?;
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table.values("T2M")?, vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(table.values("RH2M")?, vec![Some(70.0), Some(72.0), None]);
        Ok(())
    }

    #[test]
    fn test_reshape_keeps_requested_column_order() -> Result<(), AidWeatherError> {
        let raw = raw(vec![
            ("A", vec![("20200101", Some(1.0))]),
            ("B", vec![("20200101", Some(2.0))]),
            ("EXTRA", vec![("20200101", Some(9.0))]),
        ]);
        let params = ParameterSet::new(["B", "A", "MISSING"])?;
        let table = TableReshaper::new(params).reshape(&raw)?;
        assert_eq!(table.value_columns(), ["B", "A", "MISSING"]);
        assert_eq!(table.values("MISSING")?, vec![None]);
        assert!(!table.has_column("EXTRA"));
        Ok(())
    }

    #[test]
    fn test_fill_value_and_nan_become_null() -> Result<(), AidWeatherError> {
        let raw = raw(vec![(
            "T2M",
            vec![
                ("20200101", Some(-999.0)),
                ("20200102", Some(f64::NAN)),
                ("20200103", None),
                ("20200104", Some(4.0)),
            ],
        )]);
        let params = ParameterSet::new(["T2M"])?;
        let table = TableReshaper::new(params)
            .with_fill_value(Some(-999.0))
            .reshape(&raw)?;
        assert_eq!(table.values("T2M")?, vec![None, None, None, Some(4.0)]);
        Ok(())
    }

    #[test]
    fn test_window_drops_foreign_dates() -> Result<(), AidWeatherError> {
        let raw = raw(vec![(
            "T2M",
            vec![
                ("20191231", Some(0.0)),
                ("20200101", Some(1.0)),
                ("20200102", Some(2.0)),
            ],
        )]);
        let window = TimeRange::between("2020-01-01", "2020-01-31")?;
        let table = TableReshaper::new(ParameterSet::new(["T2M"])?)
            .with_window(window)
            .reshape(&raw)?;
        assert_eq!(table.height(), 2);
        assert!(table.dates()?.iter().all(|d| window.contains(*d)));
        Ok(())
    }

    #[test]
    fn test_malformed_key_fails_reshape() -> Result<(), AidWeatherError> {
        let raw = raw(vec![("T2M", vec![("2020-01-01", Some(1.0))])]);
        let result = TableReshaper::new(ParameterSet::new(["T2M"])?).reshape(&raw);
        assert!(matches!(result, Err(AidWeatherError::Format(k)) if k == "2020-01-01"));
        Ok(())
    }
}
