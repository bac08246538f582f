//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the
//! Nominatim and OSRM clients, provides position sources, loads indoor
//! floor plans, and owns configuration and logging setup.

pub mod adapters;
pub mod config;
pub mod indoor;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, IndoorAppConfig, MapConfig, NavigationAppConfig};
pub use indoor::{IndoorDatasetError, load_indoor_dataset, parse_indoor_dataset};
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
