//! Infrastructure - configuration and metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - application configuration (TOML loading, defaults)
//! - `metrics` - lock-free counter collection

pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use config::Config;
pub use metrics::{Metrics, MetricsSummary};
