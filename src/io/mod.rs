//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `catalog` - HTTP fetch of the customer catalog
//! - `router` - routing service client (OSRM-compatible HTTP API)
//! - `gps` - serial NMEA watcher for live device position
//! - `control` - TCP listener for operator commands
//! - `map` - typed map-command channel and JSONL bridge publisher

pub mod catalog;
pub mod control;
pub mod gps;
pub mod map;
pub mod router;

// Re-export commonly used types
pub use catalog::{load_catalog, CatalogClient};
pub use control::{start_control_listener, ControlListenerConfig};
pub use gps::GpsWatcher;
pub use map::{create_map_channel, MapCommand, MapCommandSender, MapPublisher, MessageLevel};
pub use router::RouterClient;
