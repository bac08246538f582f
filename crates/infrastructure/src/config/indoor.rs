//! Indoor floor-plan configuration

use std::path::PathBuf;

use application::IndoorOverlaySettings;
use domain::FloorLevel;
use serde::{Deserialize, Serialize};

/// Indoor overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndoorAppConfig {
    /// GeoJSON floor-plan dataset; no overlay when unset
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Floor shown first
    #[serde(default)]
    pub initial_floor: FloorLevel,

    /// When and how the overlay is shown
    #[serde(default)]
    pub overlay: IndoorOverlaySettings,
}

impl IndoorAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.overlay.level_property.trim().is_empty() {
            return Err("overlay.level_property must not be empty".to_string());
        }
        if self.overlay.activation_radius_m.is_nan() || self.overlay.activation_radius_m <= 0.0 {
            return Err("overlay.activation_radius_m must be greater than 0".to_string());
        }
        Ok(())
    }
}
