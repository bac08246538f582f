//! Application services - Use case implementations

mod indoor_overlay;
mod map_session;
mod navigation_service;

pub use indoor_overlay::{
    DEFAULT_LEVEL_PROPERTY, IndoorOverlay, IndoorOverlaySettings, feature_level, filter_by_floor,
};
pub use map_session::{MISSING_ENDPOINTS, MapSession};
pub use navigation_service::{NavigationProgress, NavigationService};
