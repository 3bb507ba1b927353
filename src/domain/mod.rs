//! Domain models - core dispatch types
//!
//! This module contains the canonical data types used throughout the system:
//! - `Location` - a known customer location from the catalog
//! - `Position` - the latest observed device position
//! - `Selection` - the operator-chosen ordered subset of catalog ids
//! - `RouteRequest` / `RouteSummary` - routing-service input and output
//! - `SessionEvent` - every asynchronous input, normalized onto one queue

pub mod route;
pub mod selection;
pub mod types;

// Re-export commonly used types at module level
pub use route::{RouteRequest, RouteSummary};
pub use selection::Selection;
pub use types::{Coordinates, CustomerId, Location, Position, RouteHandle, SessionEvent};
