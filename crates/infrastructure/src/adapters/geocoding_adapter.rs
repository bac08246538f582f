//! Geocoding adapter - Implements GeocodingPort using integration_nominatim

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{Coordinate, PlaceResult};
use integration_nominatim::{GeocodingClient, GeocodingError, NominatimGeocodingClient};
use tracing::instrument;

/// Adapter exposing a Nominatim client as the application's geocoding port
pub struct GeocodingAdapter<C = NominatimGeocodingClient> {
    client: C,
}

impl<C> std::fmt::Debug for GeocodingAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C: GeocodingClient> GeocodingAdapter<C> {
    /// Wrap a geocoding client
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Map integration errors onto application errors
    fn map_error(error: GeocodingError) -> ApplicationError {
        match error {
            GeocodingError::PlaceNotFound(query) => {
                ApplicationError::NotFound(format!("Place '{query}'"))
            },
            other => ApplicationError::ExternalService(format!("Geocoding failed: {other}")),
        }
    }
}

#[async_trait]
impl<C: GeocodingClient> GeocodingPort for GeocodingAdapter<C> {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<PlaceResult, ApplicationError> {
        self.client.search(query).await.map_err(Self::map_error)
    }

    async fn suggest(&self, query: &str) -> Vec<PlaceResult> {
        self.client.suggest(query).await
    }

    #[instrument(skip(self))]
    async fn reverse_lookup(&self, coordinate: &Coordinate) -> Result<PlaceResult, ApplicationError> {
        self.client
            .reverse_lookup(coordinate)
            .await
            .map_err(Self::map_error)
    }
}
