//! Configuration loading from TOML files
//!
//! Config file is selected via the --config command line argument
//! (default: config/dev.toml). All settings are read once at startup and
//! passed into the pipeline at construction; nothing is read ambiently
//! during execution.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// GeoJSON FeatureCollection of named neighborhood polygons
    #[serde(default = "default_boundaries_file")]
    pub boundaries_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { boundaries_file: default_boundaries_file() }
    }
}

fn default_boundaries_file() -> String {
    "data/neighborhoods.geojson".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file holding the zones table
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: default_store_path() }
    }
}

fn default_store_path() -> String {
    "zones.db".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TilequeryConfig {
    /// Access token for the tile query service. Absent means bearing
    /// estimation is disabled and every neighborhood uses zero rotation.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_tilequery_base_url")]
    pub base_url: String,
    #[serde(default = "default_tilequery_tileset")]
    pub tileset: String,
    /// Road search radius around the neighborhood centroid (meters)
    #[serde(default = "default_search_radius_m")]
    pub search_radius_m: u32,
    /// Maximum number of road features per query
    #[serde(default = "default_tilequery_limit")]
    pub limit: u32,
    #[serde(default = "default_tilequery_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for TilequeryConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            base_url: default_tilequery_base_url(),
            tileset: default_tilequery_tileset(),
            search_radius_m: default_search_radius_m(),
            limit: default_tilequery_limit(),
            timeout_ms: default_tilequery_timeout_ms(),
        }
    }
}

fn default_tilequery_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_tilequery_tileset() -> String {
    "mapbox.mapbox-streets-v8".to_string()
}

fn default_search_radius_m() -> u32 {
    500
}

fn default_tilequery_limit() -> u32 {
    50
}

fn default_tilequery_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    /// Square cell side length in kilometers (approximate city-block size)
    #[serde(default = "default_cell_size_km")]
    pub cell_size_km: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size_km: default_cell_size_km() }
    }
}

fn default_cell_size_km() -> f64 {
    0.28
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum delay between successive tile query calls (milliseconds)
    #[serde(default = "default_throttle_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { min_interval_ms: default_throttle_min_interval_ms() }
    }
}

fn default_throttle_min_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub tilequery: TilequeryConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    boundaries_file: String,
    store_path: String,
    tilequery_access_token: Option<String>,
    tilequery_base_url: String,
    tilequery_tileset: String,
    search_radius_m: u32,
    tilequery_limit: u32,
    tilequery_timeout_ms: u64,
    cell_size_km: f64,
    throttle_min_interval_ms: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boundaries_file: default_boundaries_file(),
            store_path: default_store_path(),
            tilequery_access_token: None,
            tilequery_base_url: default_tilequery_base_url(),
            tilequery_tileset: default_tilequery_tileset(),
            search_radius_m: default_search_radius_m(),
            tilequery_limit: default_tilequery_limit(),
            tilequery_timeout_ms: default_tilequery_timeout_ms(),
            cell_size_km: default_cell_size_km(),
            throttle_min_interval_ms: default_throttle_min_interval_ms(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            boundaries_file: toml_config.input.boundaries_file,
            store_path: toml_config.store.path,
            tilequery_access_token: toml_config.tilequery.access_token,
            tilequery_base_url: toml_config.tilequery.base_url,
            tilequery_tileset: toml_config.tilequery.tileset,
            search_radius_m: toml_config.tilequery.search_radius_m,
            tilequery_limit: toml_config.tilequery.limit,
            tilequery_timeout_ms: toml_config.tilequery.timeout_ms,
            cell_size_km: toml_config.grid.cell_size_km,
            throttle_min_interval_ms: toml_config.throttle.min_interval_ms,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    // Getters for all config fields
    pub fn boundaries_file(&self) -> &str {
        &self.boundaries_file
    }

    pub fn store_path(&self) -> &str {
        &self.store_path
    }

    pub fn tilequery_access_token(&self) -> Option<&str> {
        self.tilequery_access_token.as_deref()
    }

    pub fn tilequery_base_url(&self) -> &str {
        &self.tilequery_base_url
    }

    pub fn tilequery_tileset(&self) -> &str {
        &self.tilequery_tileset
    }

    pub fn search_radius_m(&self) -> u32 {
        self.search_radius_m
    }

    pub fn tilequery_limit(&self) -> u32 {
        self.tilequery_limit
    }

    pub fn tilequery_timeout_ms(&self) -> u64 {
        self.tilequery_timeout_ms
    }

    pub fn cell_size_km(&self) -> f64 {
        self.cell_size_km
    }

    pub fn throttle_min_interval_ms(&self) -> u64 {
        self.throttle_min_interval_ms
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.cell_size_km(), 0.28);
        assert_eq!(config.search_radius_m(), 500);
        assert_eq!(config.throttle_min_interval_ms(), 1000);
        assert!(config.tilequery_access_token().is_none());
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [grid]
            cell_size_km = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(toml_config.grid.cell_size_km, 0.5);
        assert_eq!(toml_config.tilequery.limit, 50);
        assert_eq!(toml_config.store.path, "zones.db");
    }
}
