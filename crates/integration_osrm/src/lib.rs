//! OSRM routing integration for Wayfinder
//!
//! Builds driving routes with full geometry and step-level maneuvers using
//! the [OSRM](https://project-osrm.org) route service.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Coordinate;
//! use integration_osrm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client
//!     .build_route(
//!         &Coordinate::new(59.9311, 30.3609)?, // Moskovsky station
//!         &Coordinate::new(59.9398, 30.3146)?, // Hermitage
//!     )
//!     .await?;
//! println!("{}", route.format_summary());
//! ```

mod client;
mod config;
mod error;
mod instructions;
mod models;

pub use client::{OsrmRoutingClient, RoutingClient};
pub use config::OsrmConfig;
pub use error::RoutingError;
pub use instructions::directive_text;
