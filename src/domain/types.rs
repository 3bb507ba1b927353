//! Shared types for the dispatch core

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Newtype wrapper for catalog customer ids to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CustomerId(pub i64);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for rendered route control handles
///
/// Handles are assigned by the session (monotonic counter), so the map bridge
/// never needs a back-channel to report what it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(transparent)]
pub struct RouteHandle(pub u64);

impl std::fmt::Display for RouteHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// The latest observed device position.
///
/// Each new `Position` supersedes the prior one; the session keeps at most
/// one current position and no history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub coordinates: Coordinates,
    /// Epoch ms at which the fix was observed
    pub observed_at: u64,
}

impl Position {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates, observed_at: epoch_ms() }
    }
}

/// A known customer location, immutable once loaded from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: CustomerId,
    pub name: String,
    pub contact: String,
    pub coordinates: Coordinates,
}

/// Wire format of one catalog entry (`GET /api/customers`)
#[derive(Debug, Deserialize)]
pub struct CustomerRecord {
    pub id: i64,
    pub name: String,
    pub contact: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<CustomerRecord> for Location {
    fn from(rec: CustomerRecord) -> Self {
        Location {
            id: CustomerId(rec.id),
            name: rec.name,
            contact: rec.contact,
            coordinates: Coordinates::new(rec.latitude, rec.longitude),
        }
    }
}

/// Every asynchronous input to the route session, delivered on one bounded
/// channel and processed to completion one at a time.
///
/// Event interleaving order matters (a position update racing an in-flight
/// route request); the single queue makes the ordering explicit and the
/// session deterministic to replay in tests.
#[derive(Debug)]
pub enum SessionEvent {
    /// Catalog fetch finished (empty vec on fetch/parse failure)
    CatalogLoaded(Vec<Location>),
    /// A new position fix was observed
    PositionObserved(Position),
    /// The observation source is unsupported, denied, or gone
    PositionLost(String),
    /// Raw operator set-route input (comma-separated ids; empty clears)
    SelectionChanged(String),
    /// Routing service produced a route for the request with this token
    RouteResolved { token: u64, summary: crate::domain::route::RouteSummary },
    /// Routing service failed for the request with this token
    RouteFailed { token: u64, reason: String },
    /// Operator asked to re-center the view on the current position
    Recenter,
    /// Operator pressed the navigate button
    Navigate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_record_into_location() {
        let rec = CustomerRecord {
            id: 7,
            name: "Galle Hardware".to_string(),
            contact: "+94 91 223 4455".to_string(),
            latitude: 6.0328,
            longitude: 80.2170,
        };

        let loc: Location = rec.into();
        assert_eq!(loc.id, CustomerId(7));
        assert_eq!(loc.name, "Galle Hardware");
        assert_eq!(loc.coordinates, Coordinates::new(6.0328, 80.2170));
    }

    #[test]
    fn test_position_supersedes() {
        let a = Position::new(Coordinates::new(6.0, 80.0));
        let b = Position::new(Coordinates::new(6.1, 80.1));
        assert!(b.observed_at >= a.observed_at);
        assert_ne!(a.coordinates, b.coordinates);
    }
}
