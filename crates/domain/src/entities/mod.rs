//! Domain entities - Places and routes produced by the external services

mod place;
mod route;

pub use place::PlaceResult;
pub use route::{Maneuver, ManeuverModifier, Route, RouteStep};
