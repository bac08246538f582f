//! Indoor floor-plan overlay
//!
//! A static building dataset is filtered down to one floor at a time and
//! shown only when the map is zoomed in near the building.

use std::collections::BTreeSet;

use domain::{Coordinate, FloorLevel};
use geojson::{Feature, FeatureCollection, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Feature property holding the floor level
pub const DEFAULT_LEVEL_PROPERTY: &str = "level";

/// Settings controlling when and how the overlay is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndoorOverlaySettings {
    /// Feature property holding the floor level
    #[serde(default = "default_level_property")]
    pub level_property: String,

    /// Building anchor; derived from the dataset when absent
    #[serde(default)]
    pub anchor: Option<Coordinate>,

    /// Overlay is shown within this distance of the anchor
    #[serde(default = "default_activation_radius_m")]
    pub activation_radius_m: f64,

    /// Overlay is shown at this zoom level and above
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
}

fn default_level_property() -> String {
    DEFAULT_LEVEL_PROPERTY.to_string()
}

const fn default_activation_radius_m() -> f64 {
    300.0
}

const fn default_min_zoom() -> f64 {
    17.0
}

impl Default for IndoorOverlaySettings {
    fn default() -> Self {
        Self {
            level_property: default_level_property(),
            anchor: None,
            activation_radius_m: default_activation_radius_m(),
            min_zoom: default_min_zoom(),
        }
    }
}

/// Floor level tagged on a feature, if it carries a usable one
pub fn feature_level(feature: &Feature, level_property: &str) -> Option<FloorLevel> {
    feature
        .property(level_property)
        .and_then(FloorLevel::from_tag)
}

/// Every feature tagged with `floor`, in original order
///
/// Levels are compared as integers, so a feature tagged `"01"` is on floor 1.
/// An absent dataset or no match yields an empty collection.
pub fn filter_by_floor(
    features: Option<&FeatureCollection>,
    floor: FloorLevel,
    level_property: &str,
) -> FeatureCollection {
    let features = features
        .map(|collection| {
            collection
                .features
                .iter()
                .filter(|f| feature_level(f, level_property) == Some(floor))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Floor-scoped view over a static indoor dataset
#[derive(Debug, Clone)]
pub struct IndoorOverlay {
    dataset: FeatureCollection,
    current_floor: FloorLevel,
    anchor: Option<Coordinate>,
    settings: IndoorOverlaySettings,
}

impl IndoorOverlay {
    /// Create an overlay showing `initial_floor`
    pub fn new(
        dataset: FeatureCollection,
        initial_floor: FloorLevel,
        settings: IndoorOverlaySettings,
    ) -> Self {
        let anchor = settings.anchor.or_else(|| dataset_center(&dataset));
        debug!(
            features = dataset.features.len(),
            ?anchor,
            "Indoor overlay created"
        );
        Self {
            dataset,
            current_floor: initial_floor,
            anchor,
            settings,
        }
    }

    /// Floor currently shown
    pub const fn current_floor(&self) -> FloorLevel {
        self.current_floor
    }

    /// Switch to another floor
    pub fn set_floor(&mut self, floor: FloorLevel) {
        debug!(%floor, "Indoor floor changed");
        self.current_floor = floor;
    }

    /// Building anchor used for the proximity check
    pub const fn anchor(&self) -> Option<Coordinate> {
        self.anchor
    }

    /// Features on the current floor
    pub fn visible_features(&self) -> FeatureCollection {
        filter_by_floor(
            Some(&self.dataset),
            self.current_floor,
            &self.settings.level_property,
        )
    }

    /// Distinct floors present in the dataset, lowest first
    pub fn available_floors(&self) -> Vec<FloorLevel> {
        self.dataset
            .features
            .iter()
            .filter_map(|f| feature_level(f, &self.settings.level_property))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether the overlay should be drawn for this map viewport
    pub fn is_active(&self, map_center: &Coordinate, zoom: f64) -> bool {
        let Some(anchor) = self.anchor else {
            return false;
        };
        zoom >= self.settings.min_zoom
            && anchor.distance_meters(map_center) <= self.settings.activation_radius_m
    }
}

/// Mean of every vertex in the dataset
fn dataset_center(dataset: &FeatureCollection) -> Option<Coordinate> {
    let mut sum_lat = 0.0;
    let mut sum_lon = 0.0;
    let mut count = 0_u32;

    let mut add = |position: &[f64]| {
        if let [lon, lat, ..] = position {
            sum_lat += lat;
            sum_lon += lon;
            count += 1;
        }
    };

    for geometry in dataset.features.iter().filter_map(|f| f.geometry.as_ref()) {
        visit_positions(&geometry.value, &mut add);
    }

    (count > 0).then(|| {
        let n = f64::from(count);
        Coordinate::new_unchecked(sum_lat / n, sum_lon / n)
    })
}

fn visit_positions(value: &Value, visit: &mut impl FnMut(&[f64])) {
    match value {
        Value::Point(p) => visit(p),
        Value::MultiPoint(ps) | Value::LineString(ps) => {
            for p in ps {
                visit(p);
            }
        },
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for p in lines.iter().flatten() {
                visit(p);
            }
        },
        Value::MultiPolygon(polygons) => {
            for p in polygons.iter().flatten().flatten() {
                visit(p);
            }
        },
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                visit_positions(&g.value, visit);
            }
        },
    }
}
