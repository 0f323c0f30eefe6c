//! Error types for upstream fetch operations.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching league data from Sleeper.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    ConnectionFailed(String),

    #[error("Unexpected HTTP status {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No data available: {0}")]
    NoData(String),
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err.to_string())
        } else if err.is_decode() {
            FetchError::ParseError(err.to_string())
        } else {
            FetchError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::ParseError(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::InvalidUrl(err.to_string())
    }
}

impl FetchError {
    /// Map a non-success HTTP status to the matching error.
    pub fn from_status(status: u16, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        match status {
            401 | 403 => FetchError::AuthenticationFailed(endpoint),
            429 => FetchError::RateLimitExceeded,
            _ => FetchError::HttpStatus { status, endpoint },
        }
    }

    /// Returns true if this error is transient and likely to succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::ConnectionFailed(_)
            | FetchError::Timeout(_)
            | FetchError::RateLimitExceeded => true,
            FetchError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Suggested delay before the scheduler retries, if retrying makes sense.
    pub fn suggested_retry_delay(&self) -> Option<Duration> {
        match self {
            FetchError::RateLimitExceeded => Some(Duration::from_secs(60)),
            FetchError::ConnectionFailed(_) | FetchError::Timeout(_) => {
                Some(Duration::from_secs(5))
            }
            FetchError::HttpStatus { status, .. } if *status >= 500 => {
                Some(Duration::from_secs(30))
            }
            _ => None,
        }
    }
}
