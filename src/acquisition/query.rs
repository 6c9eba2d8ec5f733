//! Query descriptors for the daily point endpoint.

use crate::config::AidWeatherConfig;
use crate::types::location::{Location, TimeRange};
use crate::types::parameter::ParameterSet;

/// Everything needed to request one location's daily series.
///
/// Building a query is pure; nothing touches the network until it is handed
/// to a [`PowerFetcher`](crate::PowerFetcher).
#[derive(Debug, Clone, PartialEq)]
pub struct PowerQuery {
    location: Location,
    range: TimeRange,
    parameters: ParameterSet,
    community: String,
    response_format: String,
    base_url: String,
}

impl PowerQuery {
    pub fn build(
        config: &AidWeatherConfig,
        location: &Location,
        range: &TimeRange,
        parameters: &ParameterSet,
    ) -> Self {
        Self {
            location: location.clone(),
            range: *range,
            parameters: parameters.clone(),
            community: config.community.clone(),
            response_format: config.response_format.clone(),
            base_url: config.base_url.trim_end_matches('?').to_string(),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// The full request URL, dates rendered as `YYYYMMDD`.
    pub fn url(&self) -> String {
        format!(
            "{}?parameters={}&community={}&latitude={}&longitude={}&start={}&end={}&format={}",
            self.base_url,
            self.parameters.joined(),
            self.community,
            self.location.latitude(),
            self.location.longitude(),
            self.range.start().format("%Y%m%d"),
            self.range.end().format("%Y%m%d"),
            self.response_format,
        )
    }
}
