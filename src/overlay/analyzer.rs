use crate::error::AidWeatherError;
use crate::overlay::rolling::{rolling_mean, WindowAlignment};
use crate::overlay::secondary::SecondaryTable;
use crate::overlay::stats::{mean, sample_std};
use crate::overlay::trend::{compute_trend, RegressionTrend};
use crate::table::observation_table::ObservationTable;
use crate::types::location::TimeRange;
use crate::types::value_kind::ValueKind;
use bon::Builder;
use chrono::NaiveDate;
use log::debug;

/// Moving-average window used for count columns when none is configured.
pub const DEFAULT_COUNT_WINDOW: usize = 3;

/// A rolling mean applied to the primary series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Smoothing {
    pub window: usize,
    pub alignment: WindowAlignment,
}

impl Smoothing {
    pub fn trailing(window: usize) -> Self {
        Self {
            window,
            alignment: WindowAlignment::Trailing,
        }
    }

    pub fn centered(window: usize) -> Self {
        Self {
            window,
            alignment: WindowAlignment::Centered,
        }
    }
}

/// How an overlay is prepared. Every field is optional.
///
/// ```
/// use aidweather::{OverlayOptions, Smoothing, TimeRange};
///
/// let options = OverlayOptions::builder()
///     .parameters(vec!["T2M".to_string()])
///     .primary_smoothing(Smoothing::centered(7))
///     .date_range(TimeRange::between("2020-04-01", "2020-09-30").unwrap())
///     .build();
/// assert_eq!(options.secondary_presmoothing, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Builder)]
pub struct OverlayOptions {
    /// Primary columns to include; all of them when unset.
    pub parameters: Option<Vec<String>>,
    /// Rolling mean over each primary column. Incomplete windows become null
    /// and their rows are kept, so every primary column shares the table's
    /// date axis; filter nulls out to get only fully-covered days.
    pub primary_smoothing: Option<Smoothing>,
    /// Centered window applied to continuous secondary columns before
    /// grouping. Rows without a full window are dropped.
    pub secondary_presmoothing: Option<usize>,
    /// Trailing moving-average window for count columns. Falls back to
    /// `secondary_presmoothing`, then to [`DEFAULT_COUNT_WINDOW`].
    pub count_window: Option<usize>,
    /// Both sides are cut to this range after smoothing.
    pub date_range: Option<TimeRange>,
}

/// Mean and spread of the replicates sharing one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateBand {
    pub date: NaiveDate,
    pub mean: f64,
    /// Sample standard deviation; 0 for a single replicate.
    pub std: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayTreatment {
    /// Continuous columns: per-date bands and their linear trend.
    Band {
        bands: Vec<DateBand>,
        trend: RegressionTrend,
    },
    /// Count columns: the raw points and their trailing moving average.
    MovingAverage {
        raw: Vec<(NaiveDate, f64)>,
        average: Vec<(NaiveDate, f64)>,
        window: usize,
    },
    /// Anything else: values shown as text at their dates.
    Markers(Vec<(NaiveDate, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryOverlay {
    pub column: String,
    pub kind: ValueKind,
    pub treatment: OverlayTreatment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimarySeries {
    pub column: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// The aligned result. Nothing in here is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySeries {
    pub primary: Vec<PrimarySeries>,
    pub secondary: Vec<SecondaryOverlay>,
}

impl OverlaySeries {
    pub fn primary_column(&self, column: &str) -> Option<&PrimarySeries> {
        self.primary.iter().find(|p| p.column == column)
    }

    pub fn column(&self, column: &str) -> Option<&SecondaryOverlay> {
        self.secondary.iter().find(|s| s.column == column)
    }

    /// The trend of a continuous secondary column.
    pub fn trend(&self, column: &str) -> Option<&RegressionTrend> {
        match &self.column(column)?.treatment {
            OverlayTreatment::Band { trend, .. } => Some(trend),
            OverlayTreatment::MovingAverage { .. } | OverlayTreatment::Markers(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverlayAnalyzer {
    options: OverlayOptions,
}

impl OverlayAnalyzer {
    pub fn new(options: OverlayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// The moving-average window applied to count columns.
    pub fn count_window(&self) -> usize {
        self.options
            .count_window
            .or(self.options.secondary_presmoothing)
            .unwrap_or(DEFAULT_COUNT_WINDOW)
    }

    /// Aligns `primary` with the given `columns` of `secondary` (all of them
    /// when `columns` is empty), treating each column by its [`ValueKind`].
    ///
    /// # Errors
    ///
    /// * [`AidWeatherError::ColumnNotFound`] for an absent primary parameter or
    ///   secondary column.
    /// * [`AidWeatherError::InvalidWindow`] for any window of size 0.
    /// * [`AidWeatherError::RegressionInput`] if a continuous column is left
    ///   with fewer than two dates. The trend is fitted on every remaining
    ///   replicate, not on the per-date means.
    pub fn align<S: AsRef<str>>(
        &self,
        primary: &ObservationTable,
        secondary: &SecondaryTable,
        columns: &[S],
    ) -> Result<OverlaySeries, AidWeatherError> {
        let range = self.options.date_range;
        if self.options.secondary_presmoothing == Some(0) || self.options.count_window == Some(0) {
            return Err(AidWeatherError::InvalidWindow);
        }

        let primary = self.primary_series(primary, range)?;

        let columns: Vec<String> = if columns.is_empty() {
            secondary.columns()
        } else {
            columns.iter().map(|c| c.as_ref().to_string()).collect()
        };
        let secondary = columns
            .iter()
            .map(|column| self.secondary_overlay(secondary, column, range))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OverlaySeries { primary, secondary })
    }

    fn primary_series(
        &self,
        table: &ObservationTable,
        range: Option<TimeRange>,
    ) -> Result<Vec<PrimarySeries>, AidWeatherError> {
        let parameters = match &self.options.parameters {
            Some(parameters) => parameters.clone(),
            None => table.value_columns(),
        };
        let dates = table.dates()?;

        parameters
            .into_iter()
            .map(|column| -> Result<PrimarySeries, AidWeatherError> {
                let mut values = table.values(&column)?;
                if let Some(smoothing) = self.options.primary_smoothing {
                    values = rolling_mean(
                        &values,
                        smoothing.window,
                        smoothing.alignment,
                        smoothing.window,
                    )?;
                }
                let (dates, values) = dates
                    .iter()
                    .copied()
                    .zip(values)
                    .filter(|(date, _)| in_range(range, *date))
                    .unzip();
                Ok(PrimarySeries {
                    column,
                    dates,
                    values,
                })
            })
            .collect()
    }

    fn secondary_overlay(
        &self,
        secondary: &SecondaryTable,
        column: &str,
        range: Option<TimeRange>,
    ) -> Result<SecondaryOverlay, AidWeatherError> {
        let kind = secondary
            .kind(column)
            .ok_or_else(|| AidWeatherError::ColumnNotFound(column.to_string()))?;

        let treatment = match kind {
            ValueKind::Continuous => {
                let mut points = secondary.points(column)?;
                if let Some(window) = self.options.secondary_presmoothing.filter(|w| *w > 1) {
                    points = presmooth(&points, window)?;
                }
                points.retain(|(date, _)| in_range(range, *date));
                let bands = date_bands(&points);
                let trend = compute_trend(column, &points)?;
                OverlayTreatment::Band { bands, trend }
            }
            ValueKind::Count => {
                let window = self.count_window();
                let points = secondary.points(column)?;
                let values: Vec<Option<f64>> = points.iter().map(|(_, v)| Some(*v)).collect();
                let smoothed = rolling_mean(&values, window, WindowAlignment::Trailing, 1)?;
                let average = points
                    .iter()
                    .zip(smoothed)
                    .filter_map(|((date, _), avg)| Some((*date, avg?)))
                    .filter(|(date, _)| in_range(range, *date))
                    .collect();
                let raw = points
                    .into_iter()
                    .filter(|(date, _)| in_range(range, *date))
                    .collect();
                OverlayTreatment::MovingAverage {
                    raw,
                    average,
                    window,
                }
            }
            ValueKind::Categorical => {
                let markers = secondary
                    .labels(column)?
                    .into_iter()
                    .filter(|(date, _)| in_range(range, *date))
                    .collect();
                OverlayTreatment::Markers(markers)
            }
        };

        debug!("Prepared {} overlay for secondary column {}", kind, column);
        Ok(SecondaryOverlay {
            column: column.to_string(),
            kind,
            treatment,
        })
    }
}

fn in_range(range: Option<TimeRange>, date: NaiveDate) -> bool {
    range.map_or(true, |r| r.contains(date))
}

/// Centered rolling mean over the rows of one column, keeping only rows with
/// a full window.
fn presmooth(
    points: &[(NaiveDate, f64)],
    window: usize,
) -> Result<Vec<(NaiveDate, f64)>, AidWeatherError> {
    let values: Vec<Option<f64>> = points.iter().map(|(_, v)| Some(*v)).collect();
    let smoothed = rolling_mean(&values, window, WindowAlignment::Centered, window)?;
    Ok(points
        .iter()
        .zip(smoothed)
        .filter_map(|((date, _), value)| Some((*date, value?)))
        .collect())
}

/// Groups date-sorted points into one band per date.
fn date_bands(points: &[(NaiveDate, f64)]) -> Vec<DateBand> {
    points
        .chunk_by(|a, b| a.0 == b.0)
        .filter_map(|group| {
            let values: Vec<f64> = group.iter().map(|(_, v)| *v).collect();
            Some(DateBand {
                date: group.first()?.0,
                mean: mean(&values)?,
                std: sample_std(&values),
                samples: values.len(),
            })
        })
        .collect()
}
