//! Navigation configuration

use domain::{ADVANCE_THRESHOLD_METERS, DEFAULT_REROUTE_THRESHOLD_METERS, NavigationThresholds};
use serde::{Deserialize, Serialize};

/// Turn-by-turn navigation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationAppConfig {
    /// Advance to the next step closer than this to the current maneuver (meters)
    #[serde(default = "default_advance_threshold_m")]
    pub advance_threshold_m: f64,

    /// Request a new route farther than this from the current maneuver (meters)
    #[serde(default = "default_reroute_threshold_m")]
    pub reroute_threshold_m: f64,

    /// Delay between fixes when replaying a track (milliseconds)
    #[serde(default = "default_replay_interval_ms")]
    pub replay_interval_ms: u64,
}

const fn default_advance_threshold_m() -> f64 {
    ADVANCE_THRESHOLD_METERS
}

const fn default_reroute_threshold_m() -> f64 {
    DEFAULT_REROUTE_THRESHOLD_METERS
}

const fn default_replay_interval_ms() -> u64 {
    1000
}

impl Default for NavigationAppConfig {
    fn default() -> Self {
        Self {
            advance_threshold_m: default_advance_threshold_m(),
            reroute_threshold_m: default_reroute_threshold_m(),
            replay_interval_ms: default_replay_interval_ms(),
        }
    }
}

impl NavigationAppConfig {
    /// Thresholds for the navigation state machine
    pub const fn thresholds(&self) -> NavigationThresholds {
        NavigationThresholds {
            advance_meters: self.advance_threshold_m,
            reroute_meters: self.reroute_threshold_m,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are inconsistent.
    pub fn validate(&self) -> Result<(), String> {
        self.thresholds().validate().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = NavigationAppConfig::default();
        assert_eq!(config.thresholds(), NavigationThresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reroute_must_exceed_advance() {
        let config = NavigationAppConfig {
            advance_threshold_m: 30.0,
            reroute_threshold_m: 20.0,
            ..NavigationAppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
