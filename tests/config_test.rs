//! Integration tests for configuration loading

use dispatch_poc::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[catalog]
base_url = "http://dispatch.test:8080"
timeout_ms = 2500

[router]
base_url = "http://osrm.test:5000"

[gps]
device = "/dev/ttyAMA0"
baud = 38400

[control]
enabled = false
port = 25900

[map]
output_file = "/tmp/bridge.jsonl"
center_lat = 5.9485
center_lon = 80.5353
initial_zoom = 12
recenter_zoom = 16

[metrics]
interval_secs = 30
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.catalog_base_url(), "http://dispatch.test:8080");
    assert_eq!(config.catalog_timeout_ms(), 2500);
    assert_eq!(config.router_base_url(), "http://osrm.test:5000");
    // Router timeout falls back to the field default
    assert_eq!(config.router_timeout_ms(), 5000);
    assert_eq!(config.gps_device(), "/dev/ttyAMA0");
    assert_eq!(config.gps_baud(), 38400);
    assert!(!config.control_enabled());
    assert_eq!(config.control_port(), 25900);
    assert_eq!(config.map_output_file(), "/tmp/bridge.jsonl");
    assert_eq!(config.map_center(), (5.9485, 80.5353));
    assert_eq!(config.initial_zoom(), 12);
    assert_eq!(config.recenter_zoom(), 16);
    assert_eq!(config.metrics_interval_secs(), 30);
}

#[test]
fn test_minimal_config_uses_section_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();

    // Only the required sections; control and metrics take defaults
    let config_content = r#"
[catalog]
base_url = "http://dispatch.test"

[router]
base_url = "http://osrm.test"

[gps]
device = "/dev/ttyUSB1"

[map]
center_lat = 6.0383
center_lon = 80.2198
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.gps_baud(), 9600);
    assert!(config.control_enabled());
    assert_eq!(config.control_port(), 25801);
    assert_eq!(config.map_output_file(), "map_commands.jsonl");
    assert_eq!(config.initial_zoom(), 10);
    assert_eq!(config.recenter_zoom(), 15);
    assert_eq!(config.metrics_interval_secs(), 10);
}

#[test]
fn test_malformed_config_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[catalog]\nbase_url = 42\n").unwrap();
    temp_file.flush().unwrap();

    assert!(Config::from_file(temp_file.path()).is_err());
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.config_file(), "default");
    assert_eq!(config.catalog_base_url(), "http://127.0.0.1:5000");
    assert_eq!(config.router_base_url(), "https://router.project-osrm.org");
}
