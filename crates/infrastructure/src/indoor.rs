//! Indoor floor-plan dataset loading

use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, GeoJson};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while loading a floor-plan dataset
#[derive(Debug, Error)]
pub enum IndoorDatasetError {
    /// Dataset file could not be read
    #[error("Failed to read indoor dataset {path}: {source}")]
    Io {
        /// Dataset location
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Dataset is not valid GeoJSON
    #[error("Invalid indoor dataset: {0}")]
    Parse(String),
}

/// Load a floor-plan dataset from a GeoJSON file
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry
/// (wrapped as an untagged feature).
#[instrument]
pub fn load_indoor_dataset(path: &Path) -> Result<FeatureCollection, IndoorDatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| IndoorDatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_indoor_dataset(&text)?;
    debug!(features = dataset.features.len(), "Indoor dataset loaded");
    Ok(dataset)
}

/// Parse a floor-plan dataset from GeoJSON text
pub fn parse_indoor_dataset(text: &str) -> Result<FeatureCollection, IndoorDatasetError> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| IndoorDatasetError::Parse(e.to_string()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => return Ok(collection),
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            bbox: None,
            geometry: Some(geometry),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
