//! Routing service port

use async_trait::async_trait;
use domain::{Coordinate, Route};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for building drivable routes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Build a route with full geometry and maneuver steps
    ///
    /// Steps are returned in itinerary order. Fails with
    /// [`ApplicationError::NotFound`] when no route exists.
    async fn build_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, ApplicationError>;
}
