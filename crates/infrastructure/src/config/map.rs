//! Map view configuration

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// Map display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Raster tile URL template with `{z}`, `{x}` and `{y}` placeholders
    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,

    /// Centre shown before any location is known
    #[serde(default = "Coordinate::default_map_center")]
    pub initial_center: Coordinate,

    /// Initial zoom level
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: f64,

    /// Lowest zoom level the map allows
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,

    /// Highest zoom level the map allows
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
}

/// Northernmost latitude representable in Web Mercator tiles
const MERCATOR_MAX_LATITUDE: f64 = 85.051_128_78;

fn default_tile_url_template() -> String {
    "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

const fn default_initial_zoom() -> f64 {
    15.0
}

const fn default_min_zoom() -> f64 {
    5.0
}

const fn default_max_zoom() -> f64 {
    19.0
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url_template: default_tile_url_template(),
            initial_center: Coordinate::default_map_center(),
            initial_zoom: default_initial_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
        }
    }
}

impl MapConfig {
    /// Restrict a zoom level to the configured bounds
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Tile URL for the given tile address
    #[must_use]
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.tile_url_template
            .replace("{s}", "a")
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    /// Address of the tile covering `point` at `zoom`
    ///
    /// The zoom is clamped to the configured bounds and truncated to a whole
    /// level. Latitudes beyond the Web Mercator limit map to the edge rows.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tile_address(&self, point: &Coordinate, zoom: f64) -> (u8, u32, u32) {
        let z = self.clamp_zoom(zoom).clamp(0.0, 30.0).floor() as u8;
        let n = f64::from(1_u32 << z);
        let last = (1_u32 << z) - 1;

        let x = ((point.longitude() + 180.0) / 360.0 * n).floor();
        let lat = point
            .latitude()
            .clamp(-MERCATOR_MAX_LATITUDE, MERCATOR_MAX_LATITUDE)
            .to_radians();
        let y = ((1.0 - lat.tan().asinh() / std::f64::consts::PI) / 2.0 * n).floor();

        (z, (x.max(0.0) as u32).min(last), (y.max(0.0) as u32).min(last))
    }

    /// URL of the tile covering `point` at `zoom`
    #[must_use]
    pub fn tile_url_at(&self, point: &Coordinate, zoom: f64) -> String {
        let (z, x, y) = self.tile_address(point, zoom);
        self.tile_url(z, x, y)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_url_template.contains(placeholder) {
                return Err(format!("tile_url_template is missing {placeholder}"));
            }
        }

        if self.initial_zoom.is_nan()
            || self.initial_zoom < self.min_zoom
            || self.initial_zoom > self.max_zoom
        {
            return Err(format!(
                "initial_zoom {} must lie within {}..={}",
                self.initial_zoom, self.min_zoom, self.max_zoom
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MapConfig::default();
        assert_eq!(config.initial_center, Coordinate::default_map_center());
        assert!((config.min_zoom - 5.0).abs() < f64::EPSILON);
        assert!((config.max_zoom - 19.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clamp_zoom() {
        let config = MapConfig::default();
        assert!((config.clamp_zoom(2.0) - 5.0).abs() < f64::EPSILON);
        assert!((config.clamp_zoom(25.0) - 19.0).abs() < f64::EPSILON);
        assert!((config.clamp_zoom(12.5) - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tile_url() {
        let config = MapConfig {
            tile_url_template: "https://{s}.tile.example.org/{z}/{x}/{y}.png".to_string(),
            ..MapConfig::default()
        };
        assert_eq!(
            config.tile_url(15, 19144, 9524),
            "https://a.tile.example.org/15/19144/9524.png"
        );
    }

    #[test]
    fn test_tile_address() {
        let config = MapConfig {
            min_zoom: 0.0,
            ..MapConfig::default()
        };
        assert_eq!(
            config.tile_address(&Coordinate::default_map_center(), 15.0),
            (15, 19143, 9526)
        );
        assert_eq!(
            config.tile_address(&Coordinate::new_unchecked(0.0, 0.0), 1.0),
            (1, 1, 1)
        );
        // edges stay inside the tile grid
        assert_eq!(
            config.tile_address(&Coordinate::new_unchecked(89.0, 180.0), 3.0),
            (3, 7, 0)
        );
        assert_eq!(
            config.tile_address(&Coordinate::new_unchecked(-89.0, -180.0), 2.0),
            (2, 0, 3)
        );
    }

    #[test]
    fn test_tile_url_at_clamps_zoom() {
        let config = MapConfig::default();
        assert_eq!(
            config.tile_url_at(&Coordinate::default_map_center(), 15.7),
            "https://tile.openstreetmap.org/15/19143/9526.png"
        );
        assert!(
            config
                .tile_url_at(&Coordinate::default_map_center(), 30.0)
                .starts_with("https://tile.openstreetmap.org/19/")
        );
    }

    #[test]
    fn test_validation_failures() {
        let config = MapConfig {
            tile_url_template: "https://tiles.example.org/static.png".to_string(),
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MapConfig {
            initial_zoom: 3.0,
            ..MapConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
