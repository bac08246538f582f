//! Driving routes and their maneuver steps
//!
//! A [`Route`] is replaced wholesale when rebuilt and never edited in place.
//! The order of [`Route::steps`] is the itinerary order; navigation indexes
//! into it positionally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Coordinate;

/// Turn direction attached to a maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverModifier {
    /// Turn around
    UTurn,
    /// Sharp right
    SharpRight,
    /// Right
    Right,
    /// Slight right
    SlightRight,
    /// Straight ahead
    Straight,
    /// Slight left
    SlightLeft,
    /// Left
    Left,
    /// Sharp left
    SharpLeft,
}

impl ManeuverModifier {
    /// Parse a routing-service modifier string (e.g. `"slight left"`)
    #[must_use]
    pub fn parse(modifier: &str) -> Option<Self> {
        match modifier.trim().to_ascii_lowercase().as_str() {
            "uturn" | "u-turn" | "u turn" => Some(Self::UTurn),
            "sharp right" => Some(Self::SharpRight),
            "right" => Some(Self::Right),
            "slight right" => Some(Self::SlightRight),
            "straight" => Some(Self::Straight),
            "slight left" => Some(Self::SlightLeft),
            "left" => Some(Self::Left),
            "sharp left" => Some(Self::SharpLeft),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UTurn => "u-turn",
            Self::SharpRight => "sharp right",
            Self::Right => "right",
            Self::SlightRight => "slight right",
            Self::Straight => "straight",
            Self::SlightLeft => "slight left",
            Self::Left => "left",
            Self::SharpLeft => "sharp left",
        }
    }

    /// Arrow glyph for compact instruction banners
    #[must_use]
    pub const fn arrow(&self) -> &'static str {
        match self {
            Self::UTurn => "↩",
            Self::SharpRight => "↘",
            Self::Right => "→",
            Self::SlightRight => "↗",
            Self::Straight => "↑",
            Self::SlightLeft => "↖",
            Self::Left => "←",
            Self::SharpLeft => "↙",
        }
    }
}

impl fmt::Display for ManeuverModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What the driver does at a maneuver point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maneuver {
    /// Maneuver type as reported by the routing service (`turn`, `depart`, ...)
    pub kind: String,
    /// Optional turn direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<ManeuverModifier>,
}

/// A single routing instruction anchored at a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Where the maneuver happens
    pub maneuver_location: Coordinate,
    /// Short text directive, e.g. "Turn left onto Nevsky Prospekt"
    pub directive_text: String,
    /// Structured maneuver
    pub maneuver: Maneuver,
    /// Length of the step in meters
    #[serde(default)]
    pub distance_meters: f64,
}

impl RouteStep {
    /// Create a step with a bare directive and no structured maneuver data
    #[must_use]
    pub fn new(maneuver_location: Coordinate, directive_text: impl Into<String>) -> Self {
        Self {
            maneuver_location,
            directive_text: directive_text.into(),
            maneuver: Maneuver {
                kind: String::from("turn"),
                modifier: None,
            },
            distance_meters: 0.0,
        }
    }

    /// One-line banner text, e.g. "Next turn: left"
    #[must_use]
    pub fn banner(&self) -> String {
        match self.maneuver.modifier {
            Some(m) => format!("{} Next turn: {m}", m.arrow()),
            None => self.directive_text.clone(),
        }
    }
}

impl fmt::Display for RouteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directive_text)
    }
}

/// A drivable path with its road geometry and itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Road geometry in travel order
    pub polyline: Vec<Coordinate>,
    /// Maneuvers in itinerary order
    pub steps: Vec<RouteStep>,
    /// Total length in meters
    #[serde(default)]
    pub distance_meters: f64,
    /// Expected travel time in seconds
    #[serde(default)]
    pub duration_secs: f64,
}

impl Route {
    /// Create a route from geometry and steps
    #[must_use]
    pub const fn new(polyline: Vec<Coordinate>, steps: Vec<RouteStep>) -> Self {
        Self {
            polyline,
            steps,
            distance_meters: 0.0,
            duration_secs: 0.0,
        }
    }

    /// Attach length and duration totals
    #[must_use]
    pub const fn with_totals(mut self, distance_meters: f64, duration_secs: f64) -> Self {
        self.distance_meters = distance_meters;
        self.duration_secs = duration_secs;
        self
    }

    /// Whether the route can be navigated (has at least one step)
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Index of the final step, if any
    #[must_use]
    pub fn last_step_index(&self) -> Option<usize> {
        self.steps.len().checked_sub(1)
    }

    /// Compact summary such as "12.3 km, 17 min, 9 steps"
    #[must_use]
    pub fn format_summary(&self) -> String {
        let km = self.distance_meters / 1000.0;
        let minutes = (self.duration_secs / 60.0).round();
        format!("{km:.1} km, {minutes} min, {} steps", self.steps.len())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_summary())
    }
}
