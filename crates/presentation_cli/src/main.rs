//! Wayfinder CLI
//!
//! Command-line front end for place search, routing, simulated turn-by-turn
//! navigation and indoor floor plans.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use application::{
    ApplicationError, IndoorOverlay, MapSession, NavigationProgress, PositionPort,
};
use clap::{Parser, Subcommand};
use domain::{Coordinate, FloorLevel, Route};
use infrastructure::{
    AppConfig, GeocodingAdapter, RoutingAdapter, TrackReplayPositionSource,
    init_logging, load_indoor_dataset,
};
use integration_nominatim::NominatimGeocodingClient;
use integration_osrm::OsrmRoutingClient;
use serde::Serialize;
use tracing::{debug, warn};

/// Wayfinder CLI
#[derive(Parser)]
#[command(name = "wayfinder-cli")]
#[command(author, version, about = "Map search, routing and navigation", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, env = "WAYFINDER_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best match for a place name
    Search {
        /// Place name
        query: String,
    },

    /// List autocomplete suggestions for partial input
    Suggest {
        /// Partial place name
        query: String,
    },

    /// Label a map coordinate
    ///
    /// Example: wayfinder-cli reverse 59.9398,30.3146
    Reverse {
        /// Coordinate as "lat,lon"
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        at: Coordinate,
    },

    /// Build a route to a destination
    ///
    /// Example: wayfinder-cli route --from 59.9311,30.3609 "Hermitage Museum"
    Route {
        /// Starting point as "lat,lon" (defaults to the configured map centre)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Option<Coordinate>,

        /// Destination name
        destination: String,
    },

    /// Build a route and follow it turn by turn
    ///
    /// Positions come from a track file (a JSON array of
    /// `{"latitude": .., "longitude": ..}` objects) or, without one, are
    /// simulated along the route geometry.
    Navigate {
        /// Starting point as "lat,lon" (defaults to the configured map centre)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Option<Coordinate>,

        /// Destination name
        destination: String,

        /// Recorded track to replay
        #[arg(long)]
        track: Option<PathBuf>,

        /// Delay between replayed fixes in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Show the indoor floor plan for one floor
    Indoor {
        /// GeoJSON dataset (defaults to the configured dataset)
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Floor to show (defaults to the configured initial floor)
        #[arg(long, allow_hyphen_values = true)]
        floor: Option<FloorLevel>,

        /// List the floors present in the dataset
        #[arg(long)]
        levels: bool,

        /// Map centre as "lat,lon" for the visibility check
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        center: Option<Coordinate>,

        /// Map zoom for the visibility check
        #[arg(long)]
        zoom: Option<f64>,
    },

    /// Print the URL of the map tile under a point
    Tile {
        /// Point as "lat,lon" (defaults to the configured map centre)
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        at: Option<Coordinate>,

        /// Zoom level (defaults to the configured initial zoom)
        #[arg(long)]
        zoom: Option<f64>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a "lat,lon" pair
fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{value}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude \"{}\"", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude \"{}\"", lon.trim()))?;
    Coordinate::new(lat, lon).map_err(|e| e.to_string())
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };
    config.validate()?;
    Ok(config)
}

fn build_session(
    config: &AppConfig,
    positions: Arc<dyn PositionPort>,
) -> anyhow::Result<MapSession> {
    let geocoding = NominatimGeocodingClient::new(&config.geocoding)?;
    let routing = OsrmRoutingClient::new(&config.routing)?;
    Ok(MapSession::new(
        Arc::new(GeocodingAdapter::new(geocoding)),
        Arc::new(RoutingAdapter::new(routing)),
        positions,
        config.navigation.thresholds(),
    ))
}

fn load_track(path: &Path) -> anyhow::Result<Vec<Coordinate>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read track {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid track {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_route(route: &Route) {
    println!("🗺️  {}", route.format_summary());
    for (index, step) in route.steps.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, step.directive_text);
    }
}

/// Lines shown for one navigation update
fn progress_lines(progress: &NavigationProgress) -> Vec<String> {
    let mut lines: Vec<String> = progress.notices.iter().map(|n| format!("⚠️  {n}")).collect();
    if progress.rerouted {
        lines.push("🔁 Route updated".to_string());
    }
    if let Some(instruction) = &progress.instruction {
        lines.push(format!("➡️  {instruction}"));
    }
    // banner falls back to the directive when the step has no turn direction
    if let Some(banner) = &progress.banner
        && progress.instruction.as_ref() != Some(banner)
    {
        lines.push(format!("    {banner}"));
    }
    lines
}

fn print_progress(progress: &NavigationProgress) {
    for line in progress_lines(progress) {
        println!("{line}");
    }
}

/// Turn a session failure into a user-facing message
fn notice(error: &ApplicationError) -> anyhow::Error {
    anyhow::anyhow!(error.user_notice())
}

async fn plan_route(
    session: &mut MapSession,
    config: &AppConfig,
    from: Option<Coordinate>,
    destination: String,
) -> anyhow::Result<Route> {
    session.set_user_location(from.unwrap_or(config.map.initial_center));
    session.set_query(destination);
    session.search().await.map_err(|e| notice(&e))?;
    let route = session.build_route().await.map_err(|e| notice(&e))?;
    Ok(route.clone())
}

async fn navigate(
    config: &AppConfig,
    json: bool,
    from: Option<Coordinate>,
    destination: String,
    track: Option<&Path>,
    interval_ms: Option<u64>,
) -> anyhow::Result<()> {
    let interval =
        Duration::from_millis(interval_ms.unwrap_or(config.navigation.replay_interval_ms));
    let replay = Arc::new(TrackReplayPositionSource::new(Vec::new(), interval));
    let mut session = build_session(config, replay.clone())?;

    let route = plan_route(&mut session, config, from, destination).await?;
    if !json {
        print_route(&route);
    }

    let fixes = match track {
        Some(path) => load_track(path)?,
        None => route.polyline.clone(),
    };
    debug!(fixes = fixes.len(), "Replaying positions");
    replay.load(fixes);

    let progress = session.start_navigation().await.map_err(|e| notice(&e))?;
    if json {
        print_json(&progress)?;
    } else {
        print_progress(&progress);
    }

    while let Some(update) = session.next_navigation_update().await {
        match update {
            Ok(progress) if json => print_json(&progress)?,
            Ok(progress) => print_progress(&progress),
            Err(e) => {
                warn!(error = %e, "Navigation update failed");
                println!("⚠️  {}", e.user_notice());
            },
        }
    }

    session.stop_navigation();
    if !json {
        println!("🏁 Navigation finished");
    }
    Ok(())
}

fn indoor(
    config: &AppConfig,
    json: bool,
    dataset: Option<PathBuf>,
    floor: Option<FloorLevel>,
    levels: bool,
    center: Option<Coordinate>,
    zoom: Option<f64>,
) -> anyhow::Result<()> {
    let path = dataset
        .or_else(|| config.indoor.dataset_path.clone())
        .context("no indoor dataset configured; pass --dataset")?;
    let features = load_indoor_dataset(&path)?;

    let mut overlay = IndoorOverlay::new(
        features,
        config.indoor.initial_floor,
        config.indoor.overlay.clone(),
    );

    if levels {
        let floors = overlay.available_floors();
        if json {
            return print_json(&floors);
        }
        println!("🏢 Floors:");
        for floor in floors {
            println!("  {floor}");
        }
        return Ok(());
    }

    if let Some(floor) = floor {
        overlay.set_floor(floor);
    }

    let center = center.unwrap_or(config.map.initial_center);
    let zoom = config.map.clamp_zoom(zoom.unwrap_or(config.map.initial_zoom));
    if !overlay.is_active(&center, zoom) {
        println!("ℹ️  Overlay hidden at zoom {zoom} around {center}");
    }

    let visible = overlay.visible_features();
    if json {
        return print_json(&visible);
    }

    println!(
        "🏢 Floor {}: {} feature(s)",
        overlay.current_floor(),
        visible.features.len()
    );
    for feature in &visible.features {
        let name = feature
            .property("name")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("(unnamed)");
        println!("  • {name}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    // -v flags override the configured filter
    if cli.verbose > 0 {
        config.logging.log_filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Search { query } => {
            let positions = Arc::new(TrackReplayPositionSource::new(Vec::new(), Duration::ZERO));
            let mut session = build_session(&config, positions)?;
            session.set_query(query);
            let place = session.search().await.map_err(|e| notice(&e))?;
            if cli.json {
                print_json(place)?;
            } else {
                println!("📍 {place}");
            }
        },

        Commands::Suggest { query } => {
            let positions = Arc::new(TrackReplayPositionSource::new(Vec::new(), Duration::ZERO));
            let mut session = build_session(&config, positions)?;
            let suggestions = session.update_query(query).await;
            if cli.json {
                print_json(&suggestions)?;
            } else if suggestions.is_empty() {
                println!("No suggestions");
            } else {
                for (index, place) in suggestions.iter().enumerate() {
                    println!("  {}. {}", index + 1, place.label);
                }
            }
        },

        Commands::Reverse { at } => {
            let positions = Arc::new(TrackReplayPositionSource::new(Vec::new(), Duration::ZERO));
            let mut session = build_session(&config, positions)?;
            let place = session.tap_map(at).await.map_err(|e| notice(&e))?;
            if cli.json {
                print_json(place)?;
            } else {
                println!("📍 {place}");
            }
        },

        Commands::Route { from, destination } => {
            let positions = Arc::new(TrackReplayPositionSource::new(Vec::new(), Duration::ZERO));
            let mut session = build_session(&config, positions)?;
            let route = plan_route(&mut session, &config, from, destination).await?;
            if cli.json {
                print_json(&route)?;
            } else {
                print_route(&route);
            }
        },

        Commands::Navigate {
            from,
            destination,
            track,
            interval_ms,
        } => {
            navigate(
                &config,
                cli.json,
                from,
                destination,
                track.as_deref(),
                interval_ms,
            )
            .await?;
        },

        Commands::Indoor {
            dataset,
            floor,
            levels,
            center,
            zoom,
        } => indoor(&config, cli.json, dataset, floor, levels, center, zoom)?,

        Commands::Tile { at, zoom } => {
            let at = at.unwrap_or(config.map.initial_center);
            let zoom = zoom.unwrap_or(config.map.initial_zoom);
            println!("{}", config.map.tile_url_at(&at, zoom));
        },

        Commands::Config => {
            if cli.json {
                print_json(&config)?;
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        },
    }

    Ok(())
}
