//! Routing adapter - Implements RoutingPort using integration_osrm

use application::error::ApplicationError;
use application::ports::RoutingPort;
use async_trait::async_trait;
use domain::{Coordinate, Route};
use integration_osrm::{OsrmRoutingClient, RoutingClient, RoutingError};
use tracing::{debug, instrument};

/// Adapter exposing an OSRM client as the application's routing port
pub struct RoutingAdapter<C = OsrmRoutingClient> {
    client: C,
}

impl<C> std::fmt::Debug for RoutingAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C: RoutingClient> RoutingAdapter<C> {
    /// Wrap a routing client
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Map integration errors onto application errors
    fn map_error(error: RoutingError) -> ApplicationError {
        match error {
            RoutingError::NoRouteFound(detail) => {
                debug!(%detail, "Routing service found no route");
                ApplicationError::NotFound("Route".to_string())
            },
            other => ApplicationError::ExternalService(format!("Routing failed: {other}")),
        }
    }
}

#[async_trait]
impl<C: RoutingClient> RoutingPort for RoutingAdapter<C> {
    #[instrument(skip(self))]
    async fn build_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, ApplicationError> {
        self.client
            .build_route(origin, destination)
            .await
            .map_err(Self::map_error)
    }
}
