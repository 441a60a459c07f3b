//! zonegen - batch generation of street-aligned gameplay zones
//!
//! Partitions named neighborhood polygons into small grid cells aligned
//! with the local road orientation and replaces the stored zone set in
//! one transactional generation.
//!
//! Module structure:
//! - `domain/` - Core types (Neighborhood, Zone, Bearing, errors)
//! - `io/` - External interfaces (boundary file, tile query, SQLite)
//! - `services/` - Pipeline stages (bearing, grid, clipper, throttle)
//! - `infra/` - Infrastructure (Config)

use clap::Parser;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;
use zonegen::infra::Config;
use zonegen::io::{BearingSource, DisabledBearingSource, TilequeryClient, ZoneStore};
use zonegen::services::Pipeline;

/// zonegen - neighborhood zone generation pipeline
#[derive(Parser, Debug)]
#[command(name = "zonegen", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    // Structured logging, level via RUST_LOG (default: info)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(
        version = %env!("CARGO_PKG_VERSION"),
        git_hash = %env!("GIT_HASH"),
        "zonegen starting"
    );

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        boundaries_file = %config.boundaries_file(),
        store_path = %config.store_path(),
        cell_size_km = %config.cell_size_km(),
        search_radius_m = %config.search_radius_m(),
        throttle_ms = %config.throttle_min_interval_ms(),
        tilequery = %config.tilequery_access_token().map(|_| "enabled").unwrap_or("disabled"),
        "config_loaded"
    );

    // The tile service is a capability-gated collaborator: without an
    // access token every neighborhood uses zero rotation
    let source: Box<dyn BearingSource> = match config.tilequery_access_token() {
        Some(token) => {
            let client = TilequeryClient::new(
                config.tilequery_base_url(),
                config.tilequery_tileset(),
                token,
                Duration::from_millis(config.tilequery_timeout_ms()),
            );
            match client {
                Ok(client) => Box::new(client),
                Err(e) => {
                    warn!(error = %e, "tilequery_client_init_failed");
                    Box::new(DisabledBearingSource)
                }
            }
        }
        None => Box::new(DisabledBearingSource),
    };

    let store = match ZoneStore::open(config.store_path()) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, store_path = %config.store_path(), "store_open_failed");
            std::process::exit(1);
        }
    };

    let mut pipeline = Pipeline::new(config, source, store);
    match pipeline.run().await {
        Ok(summary) => {
            info!(zones = %summary.zones_written, "zonegen complete");
        }
        Err(e) => {
            error!(error = %e, "zonegen failed");
            std::process::exit(1);
        }
    }
}
