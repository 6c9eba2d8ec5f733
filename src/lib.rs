mod acquisition;
mod aid_weather;
mod cache;
mod config;
mod error;
mod filtering;
mod overlay;
mod resample;
mod table;
mod types;

#[cfg(test)]
mod test_support;

pub use aid_weather::*;
pub use config::AidWeatherConfig;
pub use error::AidWeatherError;

pub use acquisition::error::AcquisitionError;
pub use acquisition::fetcher::PowerFetcher;
pub use acquisition::query::PowerQuery;
pub use acquisition::transport::{HttpTransport, Transport};

pub use cache::SeriesCache;
pub use filtering::{filter_table, DateWindowExt, Threshold};
pub use resample::{aggregate, AggFunction, AggSpec, AggregatedTable};

pub use overlay::analyzer::*;
pub use overlay::rolling::{rolling_mean, WindowAlignment};
pub use overlay::secondary::SecondaryTable;
pub use overlay::trend::{compute_trend, ordinal_day, RegressionTrend};

pub use table::columns::{date_column, DATE_COLUMN};
pub use table::observation_table::ObservationTable;
pub use table::reshape::{parse_date_key, RawObservationMap, TableReshaper};

pub use types::frequency::Frequency;
pub use types::location::{Location, TimeRange};
pub use types::parameter::{NamingMap, ParameterSet};
pub use types::value_kind::ValueKind;

pub use types::period::{AnyDate, DateBounds, Month, Year};
