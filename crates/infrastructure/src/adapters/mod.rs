//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod geocoding_adapter;
mod position_source;
mod routing_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use position_source::{ChannelPositionSource, TrackReplayPositionSource};
pub use routing_adapter::RoutingAdapter;
