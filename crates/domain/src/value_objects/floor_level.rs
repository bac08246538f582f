//! Building floor level value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// A building floor level
///
/// Indoor datasets tag features with levels as text. Levels are normalised
/// to integers so that `"1"`, `"01"` and `" 1 "` all denote the same floor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorLevel(i32);

impl FloorLevel {
    /// Ground floor
    pub const GROUND: Self = Self(0);

    /// Create a floor level from an integer
    #[must_use]
    pub const fn new(level: i32) -> Self {
        Self(level)
    }

    /// Get the level as an integer
    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Interpret a JSON tag value (string or integral number) as a level
    ///
    /// Returns `None` for values that do not denote a single integer level.
    #[must_use]
    pub fn from_tag(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Self),
            _ => None,
        }
    }
}

impl FromStr for FloorLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| DomainError::ValidationError(format!("Invalid floor level: {s}")))
    }
}

impl fmt::Display for FloorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for FloorLevel {
    fn from(level: i32) -> Self {
        Self(level)
    }
}
