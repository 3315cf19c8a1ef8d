use crate::transport::TransportFailure;

/// Result of a single structured fetch.
pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("HTTP request failed: {0}")]
    TransportError(String),
    #[error("Failed to decode response body: {0}")]
    DecodeError(String),
    #[error("Fetch was cancelled")]
    Cancelled,
}

impl From<TransportFailure> for FetchError {
    fn from(err: TransportFailure) -> Self {
        FetchError::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::DecodeError(err.to_string())
    }
}
