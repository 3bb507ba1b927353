//! Dispatch PoC - route-session core for a map-based dispatch aid
//!
//! Loads a catalog of customer locations, tracks the live device position,
//! and lets an operator build a multi-stop route through selected customers.
//! The route-session state machine lives in `services::session`; everything
//! outside it (map front-end, routing engine, GPS device, dispatch API) is an
//! external collaborator behind an `io` interface.
//!
//! Module structure:
//! - `domain/` - core types (Location, Position, Selection, RouteRequest)
//! - `io/` - external interfaces (catalog HTTP, router HTTP, GPS serial,
//!   operator control TCP, map-command bridge)
//! - `services/` - business logic (RouteSession, LocationStore, RouteWorker)
//! - `infra/` - infrastructure (Config, Metrics)

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
