//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// None of these are fatal: every variant is reported to the user as a
/// notice and the session state is left as it was before the failed call.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Upstream service returned no matching result
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport failure or malformed response from an external service
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Operation requested without its prerequisites
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }

    /// Check if the upstream simply had no result
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Short message suitable for a user-facing notice
    pub fn user_notice(&self) -> String {
        match self {
            Self::NotFound(what) => format!("{what} not found"),
            Self::ExternalService(_) => "Service is unavailable, please try again".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Domain(e) => e.to_string(),
            Self::Configuration(_) | Self::Internal(_) => "Something went wrong".to_string(),
        }
    }
}
