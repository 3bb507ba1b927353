//! Configuration loading from TOML files
//!
//! Config file is selected via the `--config` command line argument; a
//! missing or malformed file falls back to defaults with a warning.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the dispatch API serving `/api/customers`
    pub base_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Base URL of the OSRM-compatible routing service
    pub base_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_http_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
pub struct GpsConfig {
    pub device: String,
    #[serde(default = "default_gps_baud")]
    pub baud: u32,
}

fn default_gps_baud() -> u32 {
    9600
}

#[derive(Debug, Clone, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "default_control_enabled")]
    pub enabled: bool,
    #[serde(default = "default_control_port")]
    pub port: u16,
}

fn default_control_enabled() -> bool {
    true
}

fn default_control_port() -> u16 {
    25801
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self { enabled: default_control_enabled(), port: default_control_port() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// JSONL file the front-end bridge tails for map commands
    #[serde(default = "default_map_output_file")]
    pub output_file: String,
    /// Initial view center latitude
    pub center_lat: f64,
    /// Initial view center longitude
    pub center_lon: f64,
    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
    #[serde(default = "default_recenter_zoom")]
    pub recenter_zoom: u8,
}

fn default_map_output_file() -> String {
    "map_commands.jsonl".to_string()
}

fn default_initial_zoom() -> u8 {
    10
}

fn default_recenter_zoom() -> u8 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval")]
    pub interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub catalog: CatalogConfig,
    pub router: RouterConfig,
    pub gps: GpsConfig,
    #[serde(default)]
    pub control: ControlConfig,
    pub map: MapConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    catalog_base_url: String,
    catalog_timeout_ms: u64,
    router_base_url: String,
    router_timeout_ms: u64,
    gps_device: String,
    gps_baud: u32,
    control_enabled: bool,
    control_port: u16,
    map_output_file: String,
    map_center_lat: f64,
    map_center_lon: f64,
    initial_zoom: u8,
    recenter_zoom: u8,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_base_url: "http://127.0.0.1:5000".to_string(),
            catalog_timeout_ms: 5000,
            router_base_url: "https://router.project-osrm.org".to_string(),
            router_timeout_ms: 5000,
            gps_device: "/dev/ttyUSB0".to_string(),
            gps_baud: 9600,
            control_enabled: true,
            control_port: 25801,
            map_output_file: "map_commands.jsonl".to_string(),
            // Galle district
            map_center_lat: 6.0383,
            map_center_lon: 80.2198,
            initial_zoom: 10,
            recenter_zoom: 15,
            metrics_interval_secs: 10,
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
            catalog_base_url: toml_config.catalog.base_url,
            catalog_timeout_ms: toml_config.catalog.timeout_ms,
            router_base_url: toml_config.router.base_url,
            router_timeout_ms: toml_config.router.timeout_ms,
            gps_device: toml_config.gps.device,
            gps_baud: toml_config.gps.baud,
            control_enabled: toml_config.control.enabled,
            control_port: toml_config.control.port,
            map_output_file: toml_config.map.output_file,
            map_center_lat: toml_config.map.center_lat,
            map_center_lon: toml_config.map.center_lon,
            initial_zoom: toml_config.map.initial_zoom,
            recenter_zoom: toml_config.map.recenter_zoom,
            metrics_interval_secs: toml_config.metrics.interval_secs,
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
    pub fn catalog_base_url(&self) -> &str {
        &self.catalog_base_url
    }

    pub fn catalog_timeout_ms(&self) -> u64 {
        self.catalog_timeout_ms
    }

    pub fn router_base_url(&self) -> &str {
        &self.router_base_url
    }

    pub fn router_timeout_ms(&self) -> u64 {
        self.router_timeout_ms
    }

    pub fn gps_device(&self) -> &str {
        &self.gps_device
    }

    pub fn gps_baud(&self) -> u32 {
        self.gps_baud
    }

    pub fn control_enabled(&self) -> bool {
        self.control_enabled
    }

    pub fn control_port(&self) -> u16 {
        self.control_port
    }

    pub fn map_output_file(&self) -> &str {
        &self.map_output_file
    }

    pub fn map_center(&self) -> (f64, f64) {
        (self.map_center_lat, self.map_center_lon)
    }

    pub fn initial_zoom(&self) -> u8 {
        self.initial_zoom
    }

    pub fn recenter_zoom(&self) -> u8 {
        self.recenter_zoom
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog_base_url(), "http://127.0.0.1:5000");
        assert_eq!(config.router_base_url(), "https://router.project-osrm.org");
        assert_eq!(config.gps_device(), "/dev/ttyUSB0");
        assert_eq!(config.gps_baud(), 9600);
        assert_eq!(config.control_port(), 25801);
        assert_eq!(config.map_center(), (6.0383, 80.2198));
        assert_eq!(config.initial_zoom(), 10);
        assert_eq!(config.recenter_zoom(), 15);
    }

    #[test]
    fn test_load_from_path_fallback() {
        let config = Config::load_from_path("/nonexistent/config.toml");
        assert_eq!(config.config_file(), "default");
        assert_eq!(config.control_port(), 25801);
    }
}
