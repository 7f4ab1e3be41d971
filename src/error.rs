//! Trip query error types

use thiserror::Error;

/// Errors that can occur while executing a trip query
#[derive(Debug, Error)]
pub enum TripQueryError {
    /// Connection to the journey-planning API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the GraphQL endpoint failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with GraphQL-level errors
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Failed to parse the response payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying (if provided by the API)
        retry_after_secs: Option<u64>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl TripQueryError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimited { .. }
        )
    }
}
