//! Integration tests for configuration loading

use std::io::Write;
use tempfile::NamedTempFile;
use zonegen::infra::Config;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[input]
boundaries_file = "fixtures/hoods.geojson"

[store]
path = "out/zones.db"

[tilequery]
access_token = "pk.test-token"
search_radius_m = 250
limit = 25
timeout_ms = 2000

[grid]
cell_size_km = 0.5

[throttle]
min_interval_ms = 400
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.boundaries_file(), "fixtures/hoods.geojson");
    assert_eq!(config.store_path(), "out/zones.db");
    assert_eq!(config.tilequery_access_token(), Some("pk.test-token"));
    assert_eq!(config.search_radius_m(), 250);
    assert_eq!(config.tilequery_limit(), 25);
    assert_eq!(config.tilequery_timeout_ms(), 2000);
    assert_eq!(config.cell_size_km(), 0.5);
    assert_eq!(config.throttle_min_interval_ms(), 400);
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.boundaries_file(), "data/neighborhoods.geojson");
    assert_eq!(config.cell_size_km(), 0.28);
    assert!(config.tilequery_access_token().is_none());
}

#[test]
fn test_missing_sections_use_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[grid]\ncell_size_km = 1.0\n").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config.cell_size_km(), 1.0);
    assert_eq!(config.search_radius_m(), 500);
    assert_eq!(config.store_path(), "zones.db");
}
