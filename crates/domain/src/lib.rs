//! Domain layer for Wayfinder
//!
//! Contains the geographic value objects, the place and route entities, and
//! the pure turn-by-turn navigation state machine. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod navigation;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use navigation::{
    ADVANCE_THRESHOLD_METERS, ActiveNavigation, DEFAULT_REROUTE_THRESHOLD_METERS,
    NavigationEffect, NavigationEvent, NavigationState, NavigationThresholds,
};
pub use value_objects::*;
