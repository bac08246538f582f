//! Application configuration
//!
//! Split into focused sub-modules:
//! - `map`: tile source, initial centre and zoom bounds
//! - `navigation`: step advancement and reroute thresholds
//! - `indoor`: floor-plan dataset and overlay activation
//!
//! The geocoding and routing sections reuse the integration crates' own
//! configuration types.

mod indoor;
mod map;
mod navigation;

use std::path::Path;

use application::error::ApplicationError;
use integration_nominatim::NominatimConfig;
use integration_osrm::OsrmConfig;
use serde::{Deserialize, Serialize};

pub use indoor::IndoorAppConfig;
pub use map::MapConfig;
pub use navigation::NavigationAppConfig;

use crate::telemetry::LoggingConfig;

/// Prefix of environment variables overriding the configuration
pub const ENV_PREFIX: &str = "WAYFINDER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Place search (Nominatim)
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Route building (OSRM)
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Turn-by-turn navigation
    #[serde(default)]
    pub navigation: NavigationAppConfig,

    /// Map display
    #[serde(default)]
    pub map: MapConfig,

    /// Indoor floor-plan overlay
    #[serde(default)]
    pub indoor: IndoorAppConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder(config::File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file plus environment
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::builder(config::File::from(path).required(true))
    }

    fn builder<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., WAYFINDER_ROUTING__PROFILE)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid section.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        let sections = [
            ("geocoding", self.geocoding.validate()),
            ("routing", self.routing.validate()),
            ("navigation", self.navigation.validate()),
            ("map", self.map.validate()),
            ("indoor", self.indoor.validate()),
        ];
        for (section, result) in sections {
            result.map_err(|e| ApplicationError::Configuration(format!("{section}: {e}")))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::{Coordinate, FloorLevel};

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geocoding.timeout_secs, None);
        assert_eq!(config.routing.timeout_secs, None);
        assert_eq!(config.routing.profile, "driving");
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
            [geocoding]
            base_url = "http://localhost:8080"
            min_request_interval_ms = 0
            country_filter = "ru"

            [routing]
            profile = "walking"
            timeout_secs = 10

            [navigation]
            reroute_threshold_m = 75.0

            [map]
            initial_center = { latitude = 55.7558, longitude = 37.6173 }

            [indoor]
            dataset_path = "campus.geojson"
            initial_floor = 2

            [indoor.overlay]
            level_property = "floor"
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();

        assert_eq!(config.geocoding.base_url, "http://localhost:8080");
        assert_eq!(config.geocoding.min_request_interval_ms, 0);
        assert_eq!(config.geocoding.country_filter.as_deref(), Some("ru"));
        assert_eq!(config.geocoding.cache_ttl_hours, 24);
        assert_eq!(config.routing.profile, "walking");
        assert_eq!(config.routing.timeout_secs, Some(10));
        assert!((config.navigation.reroute_threshold_m - 75.0).abs() < f64::EPSILON);
        assert!((config.navigation.advance_threshold_m - 10.0).abs() < f64::EPSILON);
        assert_eq!(
            config.map.initial_center,
            Coordinate::new_unchecked(55.7558, 37.6173)
        );
        assert_eq!(config.indoor.initial_floor, FloorLevel::new(2));
        assert_eq!(config.indoor.overlay.level_property, "floor");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let file = write_config(
            r#"
            [map]
            initial_center = { latitude = 159.9, longitude = 30.3 }
            "#,
        );
        assert!(AppConfig::load_from(file.path()).is_err());

        let file = write_config(
            r#"
            [indoor.overlay]
            anchor = { latitude = 59.9, longitude = 230.3 }
            "#,
        );
        assert!(AppConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_validation_names_section() {
        let config = AppConfig {
            navigation: NavigationAppConfig {
                advance_threshold_m: 80.0,
                ..NavigationAppConfig::default()
            },
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("navigation"));
    }
}
