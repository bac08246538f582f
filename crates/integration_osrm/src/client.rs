//! OSRM routing client
//!
//! Requests a driving route with full GeoJSON geometry and step-level
//! maneuvers from the OSRM `/route/v1` service.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, Route};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::RoutingError;
use crate::models::RawRouteResponse;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Build the best route between two points
    async fn build_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, RoutingError>;
}

/// Client for an OSRM route service
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn route_url(&self, origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }

    /// Parse a `/route` response body into the first (best) route
    fn parse_route_response(status: StatusCode, body: &str) -> Result<Route, RoutingError> {
        let raw: RawRouteResponse = match serde_json::from_str(body) {
            Ok(raw) => raw,
            Err(_) if !status.is_success() => {
                return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
            },
            Err(e) => return Err(RoutingError::ParseError(e.to_string())),
        };

        let detail = || raw.message.clone().unwrap_or_else(|| raw.code.clone());
        match raw.code.as_str() {
            "Ok" => {},
            "NoRoute" | "NoSegment" => return Err(RoutingError::NoRouteFound(detail())),
            _ => return Err(RoutingError::RequestFailed(detail())),
        }

        raw.routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRouteFound("no routes returned".to_string()))?
            .into_route()
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(profile = %self.config.profile))]
    async fn build_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> Result<Route, RoutingError> {
        let url = self.route_url(origin, destination);
        let params = [
            ("overview", "full"),
            ("geometries", "geojson"),
            ("steps", "true"),
        ];

        debug!(%url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| RoutingError::from_transport(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded);
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::from_transport(&e))?;

        let route = Self::parse_route_response(status, &body).inspect_err(|e| {
            warn!(error = %e, "Route request failed");
        })?;

        debug!(
            steps = route.steps.len(),
            distance_m = route.distance_meters,
            "Route received"
        );
        Ok(route)
    }
}
