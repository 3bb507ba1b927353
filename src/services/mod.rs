//! Services - business logic and state management
//!
//! This module contains the core business logic services:
//! - `session` - the route session state machine (central event processor)
//! - `catalog` - the per-session location store
//! - `route_worker` - async routing-service worker

pub mod catalog;
pub mod route_worker;
pub mod session;

// Re-export commonly used types
pub use catalog::LocationStore;
pub use route_worker::{create_route_worker, RouteQuery, RouteWorker};
pub use session::{RouteSession, SessionState};
