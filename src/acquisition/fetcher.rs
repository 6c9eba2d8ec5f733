//! Runs a [`PowerQuery`] through a [`Transport`] and decodes the payload.

use crate::acquisition::error::AcquisitionError;
use crate::acquisition::query::PowerQuery;
use crate::acquisition::transport::Transport;
use crate::table::reshape::RawObservationMap;
use log::debug;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: Option<PowerProperties>,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: Option<RawObservationMap>,
}

/// Performs exactly one request per [`fetch`](PowerFetcher::fetch) call.
#[derive(Clone)]
pub struct PowerFetcher {
    transport: Arc<dyn Transport>,
}

impl PowerFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches the nested `code → (YYYYMMDD → value)` map for `query`.
    ///
    /// # Errors
    ///
    /// * Transport failures are returned as the transport reported them.
    /// * [`AcquisitionError::ResponseParse`] if the body is not the expected JSON.
    /// * [`AcquisitionError::EmptyPayload`] if `properties.parameter` is absent
    ///   or holds no values at all.
    /// * [`AcquisitionError::InvalidParameter`] for a requested code the
    ///   service left out of its answer.
    pub fn fetch(&self, query: &PowerQuery) -> Result<RawObservationMap, AcquisitionError> {
        let url = query.url();
        let body = self.transport.get(&url)?;
        let response: PowerResponse =
            serde_json::from_str(&body).map_err(|source| AcquisitionError::ResponseParse {
                url: url.clone(),
                source,
            })?;

        let raw = response
            .properties
            .and_then(|p| p.parameter)
            .filter(|parameter| parameter.values().any(|series| !series.is_empty()))
            .ok_or_else(|| AcquisitionError::EmptyPayload(url.clone()))?;

        if let Some(missing) = query.parameters().iter().find(|code| !raw.contains_key(*code)) {
            return Err(AcquisitionError::InvalidParameter(missing.to_string()));
        }

        debug!(
            "Decoded {} parameters for {} from {}",
            raw.len(),
            query.location(),
            url
        );
        Ok(raw)
    }
}

impl std::fmt::Debug for PowerFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerFetcher").finish_non_exhaustive()
    }
}
