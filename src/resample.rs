//! Calendar bucketing and per-column aggregation.

use crate::error::AidWeatherError;
use crate::table::columns::{column_dates, column_values, date_column, require_column, DATE_COLUMN};
use crate::table::observation_table::ObservationTable;
use crate::types::frequency::Frequency;
use chrono::NaiveDate;
use log::debug;
use polars::prelude::*;
use std::fmt;
use std::str::FromStr;

/// A reduction applied to the rows of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunction {
    Mean,
    Sum,
    Min,
    Max,
    Median,
    /// Sample standard deviation (`ddof = 1`).
    Std,
    /// Sample variance (`ddof = 1`).
    Var,
    /// Number of non-null values.
    Count,
    First,
    Last,
}

impl AggFunction {
    pub fn name(&self) -> &'static str {
        match self {
            AggFunction::Mean => "mean",
            AggFunction::Sum => "sum",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::Median => "median",
            AggFunction::Std => "std",
            AggFunction::Var => "var",
            AggFunction::Count => "count",
            AggFunction::First => "first",
            AggFunction::Last => "last",
        }
    }

    fn expr(&self, column: &str) -> Expr {
        let c = col(column);
        match self {
            AggFunction::Mean => c.mean(),
            AggFunction::Sum => c.sum(),
            AggFunction::Min => c.min(),
            AggFunction::Max => c.max(),
            AggFunction::Median => c.median(),
            AggFunction::Std => c.std(1),
            AggFunction::Var => c.var(1),
            AggFunction::Count => c.count(),
            AggFunction::First => c.first(),
            AggFunction::Last => c.last(),
        }
    }
}

impl FromStr for AggFunction {
    type Err = AidWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(AggFunction::Mean),
            "sum" => Ok(AggFunction::Sum),
            "min" => Ok(AggFunction::Min),
            "max" => Ok(AggFunction::Max),
            "median" => Ok(AggFunction::Median),
            "std" => Ok(AggFunction::Std),
            "var" => Ok(AggFunction::Var),
            "count" => Ok(AggFunction::Count),
            "first" => Ok(AggFunction::First),
            "last" => Ok(AggFunction::Last),
            _ => Err(AidWeatherError::InvalidAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which functions to apply to which columns.
#[derive(Debug, Clone, PartialEq)]
pub enum AggSpec {
    /// One function for every non-date column; output names are unchanged.
    Uniform(AggFunction),
    /// Only the listed columns are output. A column with a single function
    /// keeps its name, one with several yields `<column>_<function>` columns.
    PerColumn(Vec<(String, Vec<AggFunction>)>),
}

impl AggSpec {
    /// Builds a per-column spec from `(column, "fn")` pairs.
    ///
    /// ```
    /// use aidweather::{AggFunction, AggSpec};
    ///
    /// let spec = AggSpec::parse_per_column([("T2M", "mean"), ("T2M", "max"), ("PRECTOTCORR", "sum")]).unwrap();
    /// assert_eq!(
    ///     spec,
    ///     AggSpec::PerColumn(vec![
    ///         ("T2M".to_string(), vec![AggFunction::Mean, AggFunction::Max]),
    ///         ("PRECTOTCORR".to_string(), vec![AggFunction::Sum]),
    ///     ])
    /// );
    /// assert!(AggSpec::parse_per_column([("T2M", "mode")]).is_err());
    /// ```
    pub fn parse_per_column<I, C, F>(pairs: I) -> Result<Self, AidWeatherError>
    where
        I: IntoIterator<Item = (C, F)>,
        C: Into<String>,
        F: AsRef<str>,
    {
        let mut columns: Vec<(String, Vec<AggFunction>)> = Vec::new();
        for (column, function) in pairs {
            let column = column.into();
            let function: AggFunction = function.as_ref().parse()?;
            match columns.iter_mut().find(|(c, _)| *c == column) {
                Some((_, functions)) if functions.contains(&function) => {}
                Some((_, functions)) => functions.push(function),
                None => columns.push((column, vec![function])),
            }
        }
        Ok(AggSpec::PerColumn(columns))
    }

    fn exprs(&self, table: &ObservationTable) -> Result<Vec<Expr>, AidWeatherError> {
        match self {
            AggSpec::Uniform(function) => Ok(table
                .value_columns()
                .iter()
                .map(|c| function.expr(c).alias(c.as_str()))
                .collect()),
            AggSpec::PerColumn(columns) => {
                let mut exprs = Vec::new();
                for (column, functions) in columns {
                    require_column(table.frame(), column)?;
                    for function in functions {
                        let name = if functions.len() == 1 {
                            column.clone()
                        } else {
                            format!("{}_{}", column, function.name())
                        };
                        exprs.push(function.expr(column).alias(name.as_str()));
                    }
                }
                Ok(exprs)
            }
        }
    }
}

/// One row per non-empty bucket, keyed by the bucket's anchor date.
#[derive(Debug, Clone)]
pub struct AggregatedTable {
    frame: DataFrame,
    frequency: Frequency,
}

impl AggregatedTable {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>, AidWeatherError> {
        let column = require_column(&self.frame, DATE_COLUMN)?;
        Ok(column_dates(column)?.into_iter().flatten().collect())
    }

    pub fn values(&self, column: &str) -> Result<Vec<Option<f64>>, AidWeatherError> {
        Ok(column_values(require_column(&self.frame, column)?)?)
    }
}

/// Buckets `table` by `frequency` and reduces each bucket according to `spec`.
///
/// Buckets without rows are omitted and partial buckets at either end are
/// reduced over the rows they have. Output rows are ordered by bucket date.
///
/// # Errors
///
/// Returns [`AidWeatherError::ColumnNotFound`] if `spec` names a missing column.
pub fn aggregate(
    table: &ObservationTable,
    frequency: Frequency,
    spec: &AggSpec,
) -> Result<AggregatedTable, AidWeatherError> {
    let exprs = spec.exprs(table)?;
    let labels = table
        .dates()?
        .into_iter()
        .map(|d| frequency.bucket_label(d).ok_or(AidWeatherError::DateParsing))
        .collect::<Result<Vec<_>, _>>()?;

    let mut frame = table.frame().clone();
    frame.with_column(date_column(DATE_COLUMN, &labels)?)?;

    let frame = frame
        .lazy()
        .group_by_stable([col(DATE_COLUMN)])
        .agg(exprs)
        .sort([DATE_COLUMN], SortMultipleOptions::default())
        .collect()?;

    debug!(
        "Aggregated {} rows into {} {} buckets",
        table.height(),
        frame.height(),
        frequency
    );
    Ok(AggregatedTable { frame, frequency })
}
