//! The blocking HTTP seam between the client and the remote service.

use crate::acquisition::error::AcquisitionError;
use log::{info, warn};
use reqwest::blocking::Client;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// Performs one GET and returns the response body.
///
/// Implementations must surface every non-success outcome as an error; the
/// client never retries.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String, AcquisitionError>;
}

/// [`Transport`] over a `reqwest` blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`AcquisitionError::HttpClient`] if the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Option<Duration>) -> Result<Self, AcquisitionError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(AcquisitionError::HttpClient)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, AcquisitionError> {
        info!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| AcquisitionError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            warn!("Request to {} failed with status {}", url, status);
            return Err(AcquisitionError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .map_err(|e| AcquisitionError::NetworkRequest(url.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "needs a local socket stack"]
    fn test_unreachable_host_is_a_network_error() -> Result<(), AcquisitionError> {
        let transport = HttpTransport::new(Some(Duration::from_secs(2)))?;
        let result = transport.get("http://127.0.0.1:9/daily");
        match result {
            Err(e) => assert!(e.is_transport()),
            Ok(_) => panic!("port 9 should not answer"),
        }
        Ok(())
    }
}
