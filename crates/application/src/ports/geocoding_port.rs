//! Geocoding service port
//!
//! Resolves free text to places and map coordinates back to labels.

use async_trait::async_trait;
use domain::{Coordinate, PlaceResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Suggestions are only requested for queries longer than this many characters
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Maximum number of autocomplete suggestions
pub const MAX_SUGGESTIONS: usize = 5;

/// Port for forward and reverse geocoding
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a non-empty query to its single best match
    ///
    /// Fails with [`ApplicationError::NotFound`] when nothing matches and
    /// [`ApplicationError::ExternalService`] on transport or parse failure.
    async fn search(&self, query: &str) -> Result<PlaceResult, ApplicationError>;

    /// Best-effort autocomplete candidates in upstream rank order
    ///
    /// Queries of [`MIN_SUGGESTION_QUERY_CHARS`] characters or fewer yield an
    /// empty list without contacting the service. Failures also yield an
    /// empty list.
    async fn suggest(&self, query: &str) -> Vec<PlaceResult>;

    /// Label the given coordinate
    async fn reverse_lookup(&self, coordinate: &Coordinate)
    -> Result<PlaceResult, ApplicationError>;
}
