//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod floor_level;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, InvalidCoordinates, distance_meters};
pub use floor_level::FloorLevel;
