//! Place search results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Coordinate;

/// A resolved place: where it is and what to call it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Location of the place
    pub coordinate: Coordinate,
    /// Human-readable label shown on the marker and in suggestion lists
    pub label: String,
    /// Upstream record identifier, when the geocoder provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<u64>,
}

impl PlaceResult {
    /// Create a new place result
    #[must_use]
    pub fn new(coordinate: Coordinate, label: impl Into<String>) -> Self {
        Self {
            coordinate,
            label: label.into(),
            place_id: None,
        }
    }

    /// Attach the upstream record identifier
    #[must_use]
    pub const fn with_place_id(mut self, place_id: u64) -> Self {
        self.place_id = Some(place_id);
        self
    }

    /// Same place, different label
    #[must_use]
    pub fn relabelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl fmt::Display for PlaceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.coordinate)
    }
}
