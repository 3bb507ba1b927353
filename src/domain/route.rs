//! Route request and result types, plus metric formatting

use crate::domain::types::{Coordinates, Location, Position};
use smallvec::SmallVec;

/// Inline waypoint capacity; most routes visit a handful of stops
pub type Waypoints = SmallVec<[Coordinates; 4]>;

/// An ordered waypoint sequence handed to the routing service.
///
/// Invariant: always at least two waypoints (current position plus one or
/// more selected locations). The transition guards in the session make a
/// shorter request unreachable; construction asserts it anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub waypoints: Waypoints,
}

impl RouteRequest {
    /// Build the waypoint sequence: current position first, then each
    /// selected location in selection order.
    pub fn build<'a>(position: &Position, stops: impl Iterator<Item = &'a Location>) -> Self {
        let mut waypoints: Waypoints = SmallVec::new();
        waypoints.push(position.coordinates);
        waypoints.extend(stops.map(|loc| loc.coordinates));

        debug_assert!(waypoints.len() >= 2, "route request needs position + at least one stop");
        Self { waypoints }
    }
}

/// A computed route as reported by the routing service.
///
/// `geometry` is opaque to the session; it is forwarded verbatim to the map
/// bridge for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: String,
}

impl RouteSummary {
    /// Render total distance as displayed to the operator
    pub fn distance_text(&self) -> String {
        format!("Distance: {:.2} km", self.distance_meters / 1000.0)
    }

    /// Render total duration as displayed to the operator
    pub fn duration_text(&self) -> String {
        format!("Duration: {:.2} mins", self.duration_seconds / 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CustomerId, Location};

    fn loc(id: i64, lat: f64, lon: f64) -> Location {
        Location {
            id: CustomerId(id),
            name: format!("Customer {id}"),
            contact: String::new(),
            coordinates: Coordinates::new(lat, lon),
        }
    }

    #[test]
    fn test_waypoint_order_position_then_stops() {
        let position = Position::new(Coordinates::new(6.0383, 80.2198));
        let s1 = loc(1, 6.05, 80.22);
        let s2 = loc(2, 6.06, 80.23);

        let request = RouteRequest::build(&position, [&s1, &s2].into_iter());

        assert_eq!(
            request.waypoints.as_slice(),
            &[position.coordinates, s1.coordinates, s2.coordinates]
        );
    }

    #[test]
    fn test_metric_formatting() {
        let summary = RouteSummary {
            distance_meters: 12345.0,
            duration_seconds: 600.0,
            geometry: String::new(),
        };

        assert_eq!(summary.distance_text(), "Distance: 12.35 km");
        assert_eq!(summary.duration_text(), "Duration: 10.00 mins");
    }

    #[test]
    fn test_metric_formatting_rounds() {
        let summary = RouteSummary {
            distance_meters: 999.0,
            duration_seconds: 59.9,
            geometry: String::new(),
        };

        assert_eq!(summary.distance_text(), "Distance: 1.00 km");
        assert_eq!(summary.duration_text(), "Duration: 1.00 mins");
    }
}
