//! Nominatim service configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted search cache lifetime (one year)
pub const MAX_CACHE_TTL_HOURS: u64 = 24 * 365;

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (no timeout when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Minimum delay between two requests in milliseconds (0 to disable)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Cache TTL for search results in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Preferred result language, e.g. "en" or "ru,en"
    #[serde(default)]
    pub accept_language: Option<String>,

    /// Country code filter, e.g. "ru"
    #[serde(default)]
    pub country_filter: Option<String>,

    /// User agent sent with every request (required by the usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

fn default_user_agent() -> String {
    concat!("Wayfinder/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            min_request_interval_ms: default_min_request_interval_ms(),
            cache_ttl_hours: default_cache_ttl_hours(),
            accept_language: None,
            country_filter: None,
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: Some(5),
            min_request_interval_ms: 0,
            cache_ttl_hours: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_hours > 0
    }

    /// Lifetime of cached search results, `None` when caching is disabled
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        if !self.caching_enabled() {
            return None;
        }
        self.cache_ttl_hours
            .min(MAX_CACHE_TTL_HOURS)
            .checked_mul(3600)
            .map(Duration::from_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == Some(0) {
            return Err("timeout_secs must be greater than 0 when set".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.cache_ttl_hours > MAX_CACHE_TTL_HOURS {
            return Err(format!(
                "cache_ttl_hours must not exceed {MAX_CACHE_TTL_HOURS}"
            ));
        }

        Ok(())
    }
}
