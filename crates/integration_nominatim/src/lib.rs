//! Nominatim geocoding integration for Wayfinder
//!
//! Resolves free-text place names to coordinates, produces autocomplete
//! suggestions and labels tapped map points using the
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org) API.
//!
//! # Architecture
//!
//! [`GeocodingClient`] defines the interface, implemented by
//! [`NominatimGeocodingClient`]. The client honours Nominatim's usage policy
//! with a minimum request interval and caches forward searches.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_nominatim::{GeocodingClient, NominatimConfig, NominatimGeocodingClient};
//!
//! let client = NominatimGeocodingClient::new(&NominatimConfig::default())?;
//! let place = client.search("Hermitage Museum").await?;
//! println!("{} at {}", place.label, place.coordinate);
//! ```

mod client;
mod config;
mod error;

pub use client::{GeocodingClient, NominatimGeocodingClient, REVERSE_PLACEHOLDER_LABEL};
pub use config::{MAX_CACHE_TTL_HOURS, NominatimConfig};
pub use error::GeocodingError;
