//! Routing error types

use thiserror::Error;

/// Errors that can occur while building a route
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Routing connection failed: {0}")]
    ConnectionFailed(String),

    /// Routing service rejected the request or answered with an error code
    #[error("Routing request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the routing response
    #[error("Routing parse error: {0}")]
    ParseError(String),

    /// No route connects origin and destination
    #[error("No route found: {0}")]
    NoRouteFound(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Routing rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Routing request timed out")]
    Timeout,
}

impl RoutingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded
                | Self::Timeout
        )
    }

    pub(crate) fn from_transport(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::ConnectionFailed(error.to_string())
        }
    }
}
