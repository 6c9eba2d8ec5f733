use thiserror::Error;

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response from {url}")]
    ResponseParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {0} contained no parameter data")]
    EmptyPayload(String),

    #[error("Parameter '{0}' is not recognized by the service")]
    InvalidParameter(String),

    #[error("At least one parameter code is required")]
    NoParameters,
}

impl AcquisitionError {
    /// True for failures reaching or talking to the remote service, as opposed to
    /// a well-formed response that carried nothing usable.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AcquisitionError::HttpClient(_)
                | AcquisitionError::NetworkRequest(..)
                | AcquisitionError::HttpStatus { .. }
                | AcquisitionError::ResponseParse { .. }
        )
    }
}
