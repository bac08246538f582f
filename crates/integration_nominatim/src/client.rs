//! Nominatim geocoding client
//!
//! Converts free-form place names to coordinates and coordinates back to
//! labels using the [Nominatim](https://nominatim.openstreetmap.org) API.
//!
//! Requests are spaced by a configurable minimum interval (Nominatim allows
//! at most one request per second) and forward searches are cached.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, PlaceResult};
use moka::future::Cache;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;

/// Label used when a reverse lookup yields no display name
pub const REVERSE_PLACEHOLDER_LABEL: &str = "Selected location";

/// Queries this short (in characters) produce no suggestions
const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Upper bound on autocomplete candidates
const MAX_SUGGESTIONS: usize = 5;

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a place name to its single best match
    async fn search(&self, query: &str) -> Result<PlaceResult, GeocodingError>;

    /// Ranked autocomplete candidates; empty on short queries or failure
    async fn suggest(&self, query: &str) -> Vec<PlaceResult>;

    /// Label a coordinate picked on the map
    async fn reverse_lookup(&self, coordinate: &Coordinate)
    -> Result<PlaceResult, GeocodingError>;
}

/// Nominatim-based geocoding client with rate limiting and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, PlaceResult>>,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.cache_ttl().map(|ttl| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            min_interval: Duration::from_millis(config.min_request_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Keep requests at least `min_request_interval_ms` apart
    async fn throttle(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("format", "jsonv2".to_string())];
        if let Some(language) = &self.config.accept_language {
            params.push(("accept-language", language.clone()));
        }
        params
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Response, GeocodingError> {
        self.throttle().await;

        let url = format!("{}/{endpoint}", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| GeocodingError::from_transport(&e))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(GeocodingError::RateLimitExceeded),
            status if !status.is_success() => {
                Err(GeocodingError::RequestFailed(format!("HTTP {status}")))
            },
            _ => Ok(response),
        }
    }

    /// Forward search returning up to `limit` places in upstream rank order
    async fn forward(&self, query: &str, limit: usize) -> Result<Vec<PlaceResult>, GeocodingError> {
        let mut params = self.common_params();
        params.push(("q", query.to_string()));
        params.push(("limit", limit.to_string()));
        if let Some(countries) = &self.config.country_filter {
            params.push(("countrycodes", countries.clone()));
        }

        let body = self
            .get("search", &params)
            .await?
            .text()
            .await
            .map_err(|e| GeocodingError::from_transport(&e))?;

        parse_search_response(&body)
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<PlaceResult, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodingError::PlaceNotFound(
                "Query must not be empty".to_string(),
            ));
        }

        let cache_key = query.to_lowercase();
        if let Some(cache) = &self.cache
            && let Some(place) = cache.get(&cache_key).await
        {
            debug!(%query, "Geocoding cache hit");
            return Ok(place);
        }

        let place = self
            .forward(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GeocodingError::PlaceNotFound(query.to_string()))?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, place.clone()).await;
        }
        debug!(%query, coordinate = %place.coordinate, "Geocoded place");
        Ok(place)
    }

    #[instrument(skip(self))]
    async fn suggest(&self, query: &str) -> Vec<PlaceResult> {
        let query = query.trim();
        if query.chars().count() <= MIN_SUGGESTION_QUERY_CHARS {
            return Vec::new();
        }

        match self.forward(query, MAX_SUGGESTIONS).await {
            Ok(mut places) => {
                places.truncate(MAX_SUGGESTIONS);
                debug!(count = places.len(), "Fetched suggestions");
                places
            },
            Err(e) => {
                warn!(error = %e, "Error fetching suggestions");
                Vec::new()
            },
        }
    }

    #[instrument(skip(self))]
    async fn reverse_lookup(
        &self,
        coordinate: &Coordinate,
    ) -> Result<PlaceResult, GeocodingError> {
        let mut params = self.common_params();
        params.push(("lat", coordinate.latitude().to_string()));
        params.push(("lon", coordinate.longitude().to_string()));

        let raw: RawPlace = self
            .get("reverse", &params)
            .await?
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if let Some(reason) = &raw.error {
            debug!(%reason, "Reverse lookup found no address");
        }

        let label = raw
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| REVERSE_PLACEHOLDER_LABEL.to_string());

        let mut place = PlaceResult::new(*coordinate, label);
        place.place_id = raw.place_id;
        Ok(place)
    }
}

fn parse_search_response(body: &str) -> Result<Vec<PlaceResult>, GeocodingError> {
    let raw: Vec<RawPlace> =
        serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;
    raw.into_iter().map(RawPlace::into_place).collect()
}

/// Raw Nominatim place record (search and reverse)
#[derive(Debug, Deserialize)]
struct RawPlace {
    place_id: Option<u64>,
    lat: Option<String>,
    lon: Option<String>,
    display_name: Option<String>,
    error: Option<String>,
}

impl RawPlace {
    fn into_place(self) -> Result<PlaceResult, GeocodingError> {
        let lat = parse_degrees(self.lat.as_deref(), "latitude")?;
        let lon = parse_degrees(self.lon.as_deref(), "longitude")?;
        let coordinate =
            Coordinate::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))?;
        let mut place = PlaceResult::new(coordinate, self.display_name.unwrap_or_default());
        place.place_id = self.place_id;
        Ok(place)
    }
}

fn parse_degrees(value: Option<&str>, field: &str) -> Result<f64, GeocodingError> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| GeocodingError::ParseError(format!("Invalid {field}")))
}
