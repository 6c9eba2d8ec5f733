use crate::acquisition::error::AcquisitionError;
use crate::error::AidWeatherError;
use crate::types::parameter::{NamingMap, ParameterSet};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Service settings shared by every [`AidWeather`](crate::AidWeather) client.
///
/// Built once by the caller (via [`Default`], [`AidWeatherConfig::from_json_str`]
/// or [`AidWeatherConfig::from_path`]) and passed by reference to each client
/// constructor. Missing JSON fields fall back to the NASA POWER defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AidWeatherConfig {
    /// Daily point endpoint, without query string.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Community tag sent with every query.
    #[serde(default = "default_community")]
    pub community: String,

    /// Response format selector sent with every query.
    #[serde(default = "default_response_format")]
    pub response_format: String,

    /// Per-request timeout applied by the HTTP transport. `None` disables it.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: Option<u64>,

    /// Sentinel the service uses for missing values; mapped to null.
    #[serde(default = "default_fill_value")]
    pub fill_value: Option<f64>,

    /// Default parameters, in order, with their display labels.
    #[serde(default = "default_weather_params")]
    pub weather_params_default: NamingMap,
}

fn default_base_url() -> String {
    "https://power.larc.nasa.gov/api/temporal/daily/point".to_string()
}
fn default_community() -> String {
    "RE".to_string()
}
fn default_response_format() -> String {
    "JSON".to_string()
}
fn default_request_timeout_secs() -> Option<u64> {
    Some(60)
}
fn default_fill_value() -> Option<f64> {
    Some(-999.0)
}
fn default_weather_params() -> NamingMap {
    [
        ("T2M_RANGE", "Temperature Range at 2 Meters (°C)"),
        ("TS", "Earth Skin Temperature (°C)"),
        ("T2MDEW", "Dew Point Temperature at 2 Meters (°C)"),
        ("T2MWET", "Wet Bulb Temperature at 2 Meters (°C)"),
        ("T2M_MAX", "Max Temperature at 2 Meters (°C)"),
        ("T2M_MIN", "Min Temperature at 2 Meters (°C)"),
        ("T2M", "Temperature at 2 Meters (°C)"),
        ("QV2M", "Specific Humidity at 2 Meters (kg/kg)"),
        ("RH2M", "Rel. Humidity at 2 Meters (%)"),
        ("PRECTOTCORR", "Precipitation Corrected (mm/day)"),
        ("PS", "Surface Pressure (kPa)"),
        ("WS10M", "Wind Speed at 10 Meters (m/s)"),
        ("WS10M_MAX", "Max Wind Speed at 10 Meters (m/s)"),
        ("WS10M_MIN", "Min Wind Speed at 10 Meters (m/s)"),
        ("WS10M_RANGE", "Wind Speed Range at 10 Meters (m/s)"),
        ("WS50M", "Wind Speed at 50 Meters (m/s)"),
        ("WS50M_MAX", "Max Wind Speed at 50 Meters (m/s)"),
        ("WS50M_MIN", "Min Wind Speed at 50 Meters (m/s)"),
        ("WS50M_RANGE", "Wind Speed Range at 50 Meters (m/s)"),
    ]
    .into_iter()
    .collect()
}

impl Default for AidWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            community: default_community(),
            response_format: default_response_format(),
            request_timeout_secs: default_request_timeout_secs(),
            fill_value: default_fill_value(),
            weather_params_default: default_weather_params(),
        }
    }
}

impl AidWeatherConfig {
    /// Parses a JSON config such as
    /// `{"base_url": "...", "weather_params_default": {"T2M": "Temperature"}}`.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::ConfigParse`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, AidWeatherError> {
        serde_json::from_str(json).map_err(AidWeatherError::ConfigParse)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`AidWeatherError::ConfigRead`] if the file cannot be read and
    /// [`AidWeatherError::ConfigParse`] if its content is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AidWeatherError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| AidWeatherError::ConfigRead(path.to_path_buf(), e))?;
        Self::from_json_str(&json)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn naming_map(&self) -> &NamingMap {
        &self.weather_params_default
    }

    /// The parameters requested when a client is built without an explicit list.
    pub fn default_parameters(&self) -> Result<ParameterSet, AcquisitionError> {
        ParameterSet::new(self.weather_params_default.codes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_targets_power_daily_endpoint() -> Result<(), AcquisitionError> {
        let config = AidWeatherConfig::default();
        assert!(config.base_url.ends_with("/temporal/daily/point"));
        let params = config.default_parameters()?;
        assert_eq!(params.len(), 19);
        assert_eq!(params.codes()[0], "T2M_RANGE");
        assert_eq!(config.naming_map().label("RH2M"), "Rel. Humidity at 2 Meters (%)");
        Ok(())
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() -> Result<(), AidWeatherError> {
        let config = AidWeatherConfig::from_json_str(
            r#"{
                "base_url": "http://localhost:8080/daily",
                "weather_params_default": {"RH2M": "Humidity", "T2M": "Temperature"}
            }"#,
        )?;
        assert_eq!(config.base_url, "http://localhost:8080/daily");
        assert_eq!(config.community, "RE");
        assert_eq!(config.fill_value, Some(-999.0));
        assert_eq!(
            config.default_parameters()?.codes(),
            ["RH2M".to_string(), "T2M".to_string()]
        );
        Ok(())
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        assert!(matches!(
            AidWeatherConfig::from_json_str("{not json"),
            Err(AidWeatherError::ConfigParse(_))
        ));
        assert!(matches!(
            AidWeatherConfig::from_path("/definitely/not/here/config.json"),
            Err(AidWeatherError::ConfigRead(..))
        ));
    }
}
