//! The per-location client that ties acquisition, caching and analysis together.

use crate::acquisition::fetcher::PowerFetcher;
use crate::acquisition::query::PowerQuery;
use crate::acquisition::transport::{HttpTransport, Transport};
use crate::cache::SeriesCache;
use crate::config::AidWeatherConfig;
use crate::error::AidWeatherError;
use crate::filtering::{filter_table, Threshold};
use crate::overlay::analyzer::{OverlayAnalyzer, OverlayOptions, OverlaySeries};
use crate::overlay::secondary::SecondaryTable;
use crate::resample::{aggregate, AggFunction, AggSpec, AggregatedTable};
use crate::table::observation_table::ObservationTable;
use crate::table::reshape::TableReshaper;
use crate::types::frequency::Frequency;
use crate::types::location::{Location, TimeRange};
use crate::types::parameter::{NamingMap, ParameterSet};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

/// Which names the columns of a returned table carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnNaming {
    /// Parameter codes such as `T2M`.
    #[default]
    Codes,
    /// Labels from the configured naming map; codes without a label are kept.
    Labels,
}

/// Daily weather for one location and period.
///
/// The series is fetched from the service the first time it is needed and
/// cached for the lifetime of the client; every method hands out its own
/// copy, so callers can modify what they get freely.
///
/// # Examples
///
/// ```no_run
/// use aidweather::{AidWeather, AidWeatherConfig, AidWeatherError, Location, ParameterSet, TimeRange};
///
/// # fn main() -> Result<(), AidWeatherError> {
/// let config = AidWeatherConfig::default();
/// let client = AidWeather::builder()
///     .config(&config)
///     .location(Location::new("Lisbon", 38.7223, -9.1393)?)
///     .range(TimeRange::between("2020-01-01", "2020-01-31")?)
///     .parameters(ParameterSet::new(["T2M", "RH2M"])?)
///     .build()?;
///
/// let table = client.load()?;
/// assert_eq!(table.height(), 31);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AidWeather {
    location: Location,
    range: TimeRange,
    naming: NamingMap,
    query: PowerQuery,
    fetcher: PowerFetcher,
    reshaper: TableReshaper,
    cache: SeriesCache,
}

#[bon]
impl AidWeather {
    /// Creates a client. Nothing is fetched until the data is first needed.
    ///
    /// * `.config(&AidWeatherConfig)`: **Required.** Service settings.
    /// * `.location(Location)`: **Required.**
    /// * `.range(TimeRange)`: **Required.** Inclusive on both ends.
    /// * `.parameters(ParameterSet)`: Optional. Defaults to the config's default parameters.
    /// * `.transport(Arc<dyn Transport>)`: Optional. Defaults to an [`HttpTransport`]
    ///   using the config's request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::Acquisition`] if the default parameter list
    /// is invalid or the HTTP client cannot be built.
    #[builder]
    pub fn new(
        config: &AidWeatherConfig,
        location: Location,
        range: TimeRange,
        parameters: Option<ParameterSet>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, AidWeatherError> {
        let parameters = match parameters {
            Some(parameters) => parameters,
            None => config.default_parameters()?,
        };
        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.request_timeout())?),
        };

        let query = PowerQuery::build(config, &location, &range, &parameters);
        let reshaper = TableReshaper::new(parameters)
            .with_fill_value(config.fill_value)
            .with_window(range);

        Ok(Self {
            location,
            range,
            naming: config.naming_map().clone(),
            query,
            fetcher: PowerFetcher::new(transport),
            reshaper,
            cache: SeriesCache::new(),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.query.parameters()
    }

    pub fn naming(&self) -> &NamingMap {
        &self.naming
    }

    /// The URL the client requests (or requested) its data from.
    pub fn request_url(&self) -> String {
        self.query.url()
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_populated()
    }

    /// Returns the table with parameter codes as column names, fetching it on
    /// the first call.
    ///
    /// # Errors
    ///
    /// Any acquisition or reshape failure of the first fetch. A failed fetch
    /// is not cached, so a later call tries again.
    pub fn load(&self) -> Result<ObservationTable, AidWeatherError> {
        self.cache.get_or_fetch(|| {
            info!(
                "Fetching {} for {} ({})",
                self.query.parameters(),
                self.location,
                self.range
            );
            let raw = self.fetcher.fetch(&self.query)?;
            self.reshaper.reshape(&raw)
        })
    }

    /// The cached table, named by codes (default) or labels.
    #[builder]
    pub fn get(&self, naming: Option<ColumnNaming>) -> Result<ObservationTable, AidWeatherError> {
        self.named(naming.unwrap_or(ColumnNaming::Codes))
    }

    /// Restricts the table to a date window and value thresholds.
    ///
    /// * `.naming(ColumnNaming)`: Optional. Defaults to [`ColumnNaming::Labels`];
    ///   thresholds refer to columns by the chosen names.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: Optional. Default to the table's own span.
    /// * `.thresholds(Vec<Threshold>)`: Optional.
    #[builder]
    pub fn filter(
        &self,
        naming: Option<ColumnNaming>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        thresholds: Option<Vec<Threshold>>,
    ) -> Result<ObservationTable, AidWeatherError> {
        let table = self.named(naming.unwrap_or(ColumnNaming::Labels))?;
        filter_table(&table, start, end, thresholds.as_deref().unwrap_or_default())
    }

    /// Resamples the table to a coarser calendar frequency.
    ///
    /// * `.naming(ColumnNaming)`: Optional. Defaults to [`ColumnNaming::Labels`].
    /// * `.frequency(Frequency)`: Optional. Defaults to [`Frequency::MonthEnd`].
    /// * `.agg(AggSpec)`: Optional. Defaults to the mean of every column.
    #[builder]
    pub fn aggregate(
        &self,
        naming: Option<ColumnNaming>,
        frequency: Option<Frequency>,
        agg: Option<AggSpec>,
    ) -> Result<AggregatedTable, AidWeatherError> {
        let table = self.named(naming.unwrap_or(ColumnNaming::Labels))?;
        aggregate(
            &table,
            frequency.unwrap_or(Frequency::MonthEnd),
            &agg.unwrap_or(AggSpec::Uniform(AggFunction::Mean)),
        )
    }

    /// Aligns the weather series (by parameter code) with a secondary table.
    ///
    /// * `.secondary(&SecondaryTable)`: **Required.**
    /// * `.columns(Vec<String>)`: Optional. Secondary columns to include; all by default.
    /// * `.options(OverlayOptions)`: Optional.
    #[builder]
    pub fn overlay(
        &self,
        secondary: &SecondaryTable,
        columns: Option<Vec<String>>,
        options: Option<OverlayOptions>,
    ) -> Result<OverlaySeries, AidWeatherError> {
        let primary = self.load()?;
        let columns = columns.unwrap_or_default();
        OverlayAnalyzer::new(options.unwrap_or_default()).align(
            &primary,
            secondary,
            columns.as_slice(),
        )
    }

    fn named(&self, naming: ColumnNaming) -> Result<ObservationTable, AidWeatherError> {
        let table = self.load()?;
        match naming {
            ColumnNaming::Codes => Ok(table),
            ColumnNaming::Labels => table.renamed(&self.naming),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::error::AcquisitionError;
    use crate::overlay::analyzer::OverlayTreatment;
    use crate::test_support::{power_body, CannedTransport};
    use polars::prelude::*;

    fn january() -> TimeRange {
        TimeRange::between("2020-01-01", "2020-01-31").unwrap()
    }

    fn lisbon() -> Location {
        Location::new("Lisbon", 38.7223, -9.1393).unwrap()
    }

    fn client_with(transport: Arc<CannedTransport>) -> AidWeather {
        AidWeather::builder()
            .config(&AidWeatherConfig::default())
            .location(lisbon())
            .range(january())
            .parameters(ParameterSet::new(["T2M", "RH2M"]).unwrap())
            .transport(transport)
            .build()
            .unwrap()
    }

    fn serving_january() -> Arc<CannedTransport> {
        Arc::new(CannedTransport::serving(power_body(&["T2M", "RH2M"], &january())))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AidWeather>();
    }

    #[test]
    fn test_load_shapes_one_month() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let table = client.load()?;

        assert_eq!(table.height(), 31);
        assert_eq!(table.width(), 3);
        assert_eq!(table.value_columns(), ["T2M", "RH2M"]);
        let dates = table.dates()?;
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
        assert!(dates.iter().all(|d| january().contains(*d)));
        Ok(())
    }

    #[test]
    fn test_second_load_is_served_from_cache() -> Result<(), AidWeatherError> {
        let transport = serving_january();
        let client = client_with(transport.clone());
        assert!(!client.is_loaded());

        let first = client.load()?;
        let second = client.get().call()?;
        assert_eq!(transport.calls(), 1);
        assert_eq!(first, second);
        assert!(client.is_loaded());
        Ok(())
    }

    #[test]
    fn test_returned_tables_are_copies() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let mut frame = client.load()?.into_frame();
        frame = frame.drop("RH2M")?;
        assert_eq!(frame.width(), 2);
        assert!(client.load()?.has_column("RH2M"));
        Ok(())
    }

    #[test]
    fn test_labels_naming() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let labelled = client.get().naming(ColumnNaming::Labels).call()?;
        assert_eq!(
            labelled.value_columns(),
            ["Temperature at 2 Meters (°C)", "Rel. Humidity at 2 Meters (%)"]
        );
        assert_eq!(labelled.values("Temperature at 2 Meters (°C)")?, client.load()?.values("T2M")?);
        Ok(())
    }

    #[test]
    fn test_filter_first_half_and_identity() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let half = client.filter().start(day(1)).end(day(15)).call()?;
        assert_eq!(half.height(), 15);

        let whole = client
            .filter()
            .naming(ColumnNaming::Codes)
            .start(client.range().start())
            .end(client.range().end())
            .call()?;
        assert_eq!(whole, client.load()?);
        Ok(())
    }

    #[test]
    fn test_filter_thresholds_by_code() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        // T2M is the day index 0..=30
        let warm = client
            .filter()
            .naming(ColumnNaming::Codes)
            .thresholds(vec![Threshold::new("T2M", 20.0, 25.0)])
            .call()?;
        assert_eq!(warm.height(), 6);
        assert_eq!(warm.dates()?.first(), Some(&day(21)));
        Ok(())
    }

    #[test]
    fn test_monthly_aggregate() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let monthly = client.aggregate().naming(ColumnNaming::Codes).call()?;
        assert_eq!(monthly.frequency(), Frequency::MonthEnd);
        assert_eq!(monthly.dates()?, vec![day(31)]);
        assert_eq!(monthly.values("T2M")?, vec![Some(15.0)]);
        assert_eq!(monthly.values("RH2M")?, vec![Some(25.0)]);
        Ok(())
    }

    #[test]
    fn test_overlay_through_client() -> Result<(), AidWeatherError> {
        let client = client_with(serving_january());
        let secondary = SecondaryTable::new(DataFrame::new(vec![
            Column::new("date".into(), vec!["2020-01-05", "2020-01-10", "2020-01-15"]),
            Column::new("height".into(), vec![1.0, 2.0, 3.0]),
        ])?)?;
        let overlay = client
            .overlay()
            .secondary(&secondary)
            .columns(vec!["height".to_string()])
            .call()?;
        assert_eq!(overlay.primary.len(), 2);
        assert!(matches!(
            overlay.column("height").map(|c| &c.treatment),
            Some(OverlayTreatment::Band { .. })
        ));
        assert!((overlay.trend("height").unwrap().slope - 0.2).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_http_failure_propagates_and_is_not_cached() {
        let transport = Arc::new(CannedTransport::failing(500));
        let client = client_with(transport.clone());

        assert!(matches!(
            client.load(),
            Err(AidWeatherError::Acquisition(AcquisitionError::HttpStatus { status: 500, .. }))
        ));
        assert!(!client.is_loaded());
        assert!(client.load().is_err());
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_empty_payload_propagates() {
        let transport = Arc::new(CannedTransport::serving(r#"{"properties": {"parameter": {}}}"#));
        let client = client_with(transport);
        assert!(matches!(
            client.get().call(),
            Err(AidWeatherError::Acquisition(AcquisitionError::EmptyPayload(_)))
        ));
    }

    #[test]
    fn test_request_url_matches_client_settings() {
        let client = client_with(serving_january());
        let url = client.request_url();
        assert!(url.contains("parameters=T2M,RH2M"));
        assert!(url.contains("start=20200101&end=20200131"));
    }

    #[test]
    #[ignore = "requires network access to the NASA POWER service"]
    fn test_live_lisbon_january() -> Result<(), AidWeatherError> {
        let config = AidWeatherConfig::default();
        let client = AidWeather::builder()
            .config(&config)
            .location(lisbon())
            .range(january())
            .parameters(ParameterSet::new(["T2M", "RH2M"])?)
            .build()?;
        let table = client.load()?;
        assert_eq!(table.height(), 31);
        assert_eq!(table.width(), 3);
        Ok(())
    }
}
