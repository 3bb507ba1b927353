//! Event handlers for the route session
//!
//! Each handler applies one event type: updating position/selection state,
//! deciding whether to issue a route request, and emitting map commands and
//! operator messages.

use super::{ActiveRoute, PendingRequest, RouteSession, SessionState};
use crate::domain::route::{RouteRequest, RouteSummary};
use crate::domain::types::{Location, Position, RouteHandle};
use crate::domain::Selection;
use crate::io::map::MapCommand;
use crate::services::route_worker::RouteQuery;
use std::time::Instant;
use tracing::{debug, info, warn};

impl RouteSession {
    /// Install the catalog and register every location as a map marker
    pub(crate) fn handle_catalog_loaded(&mut self, locations: Vec<Location>) {
        info!(count = %locations.len(), "catalog_installed");
        self.store.install(locations);

        for location in self.store.locations() {
            self.map.send(MapCommand::marker(location));
        }
    }

    /// Apply a new position fix.
    ///
    /// The fix unconditionally supersedes the previous one and moves the
    /// position indicator. It triggers a route request only when a selection
    /// is waiting for the first fix; while `Requesting` or `Active`,
    /// recomputation stays operator-initiated so minor jitter does not churn
    /// the route.
    pub(crate) fn handle_position_observed(&mut self, position: Position) {
        let first_fix = self.current_position.is_none();
        self.current_position = Some(position);
        self.metrics.record_position_observed();
        self.map.send(MapCommand::position(&position));

        if first_fix {
            info!(
                lat = %position.coordinates.latitude,
                lon = %position.coordinates.longitude,
                "first_position_fix"
            );
        }

        if self.state == SessionState::AwaitingPosition {
            self.state = SessionState::Ready;
            self.request_route();
        }
    }

    /// The observation source is gone; warn the operator, keep the session.
    ///
    /// No automatic retry: recovery needs operator/environment action. An
    /// already rendered route stays valid for its selection and is kept.
    pub(crate) fn handle_position_lost(&mut self, reason: &str) {
        self.current_position = None;
        warn!(reason = %reason, "position_unavailable");
        self.map.send(MapCommand::warn(format!("Position unavailable: {reason}")));
    }

    /// Operator set-route input: parse, then re-route or clear
    pub(crate) fn handle_selection_changed(&mut self, raw: &str) {
        let selection = Selection::parse(raw, self.store.locations());

        if selection.is_empty() {
            self.clear_route();
            return;
        }

        self.metrics.record_selection_applied();
        self.selection = selection;

        if self.current_position.is_none() {
            self.state = SessionState::AwaitingPosition;
            debug!(stops = %self.selection.len(), "selection_waiting_for_position");
            self.map.send(MapCommand::warn(
                "Current location not available yet. The route will be computed once a fix arrives.",
            ));
            return;
        }

        // Ready with both selection and position; immediately attempt the
        // transition to Requesting (request_route leaves an Active state
        // untouched when the waypoints are unchanged)
        self.request_route();
    }

    /// Empty selection from any state: cancel everything, back to `Idle`
    fn clear_route(&mut self) {
        // Already Idle means nothing is selected, pending, or rendered;
        // garbage input from here is not a cancellation
        if self.state == SessionState::Idle {
            debug!("clear_ignored_nothing_to_clear");
            return;
        }

        // Dropping the pending request invalidates its token; a late result
        // no longer matches and is discarded on arrival
        self.pending = None;
        self.selection = Selection::default();

        if let Some(active) = self.active.take() {
            self.map.send(MapCommand::RemoveRoute { handle: active.handle });
        }
        self.map.send(MapCommand::SetMetrics { distance: None, duration: None });
        self.map.send(MapCommand::info("Route cleared."));

        self.state = SessionState::Idle;
        info!("route_cleared");
    }

    /// Issue a route request for the current selection and position.
    ///
    /// Preconditions (guarded by the transitions above): non-empty selection
    /// and a current position, so the request always carries at least two
    /// waypoints. A request issued while another is in flight supersedes it.
    fn request_route(&mut self) {
        let Some(position) = self.current_position else {
            debug_assert!(false, "request_route called without a position");
            return;
        };

        let stops = self.selection.iter().filter_map(|id| self.store.get(id));
        let request = RouteRequest::build(&position, stops);

        // Unchanged waypoints while a route is already rendered: keep the
        // existing control instead of removing and recreating it
        if self.state == SessionState::Active
            && self.active.as_ref().is_some_and(|a| a.waypoints == request.waypoints)
        {
            debug!("selection_unchanged_route_kept");
            return;
        }

        let token = self.next_token;
        self.next_token += 1;

        let query = RouteQuery {
            token,
            waypoints: request.waypoints.clone(),
            enqueued_at: Instant::now(),
        };

        match self.route_tx.try_send(query) {
            Ok(()) => {
                self.pending = Some(PendingRequest { token, waypoints: request.waypoints });
                self.metrics.record_route_requested();
                self.state = SessionState::Requesting;
                info!(token = %token, stops = %self.selection.len(), "route_requested");
            }
            Err(e) => {
                warn!(error = %e, "route_query_enqueue_failed");
                self.map.send(MapCommand::warn("Routing service unavailable. Try again."));
                self.pending = None;
                self.state = self.fallback_state();
            }
        }
    }

    /// Routing service success: render the route unless it is stale
    pub(crate) fn handle_route_resolved(&mut self, token: u64, summary: RouteSummary) {
        if !self.pending_matches(token) {
            self.metrics.record_stale_result_discarded();
            debug!(token = %token, "stale_route_result_discarded");
            return;
        }
        let Some(pending) = self.pending.take() else {
            return;
        };

        // Swap controls atomically within this handler: the old control is
        // removed in the same event that adds the new one
        if let Some(old) = self.active.take() {
            self.map.send(MapCommand::RemoveRoute { handle: old.handle });
        }

        let handle = self.new_handle();
        self.map.send(MapCommand::route(handle, &pending.waypoints, &summary.geometry));
        self.map.send(MapCommand::SetMetrics {
            distance: Some(summary.distance_text()),
            duration: Some(summary.duration_text()),
        });

        info!(
            token = %token,
            handle = %handle,
            distance_m = %summary.distance_meters,
            duration_s = %summary.duration_seconds,
            "route_active"
        );

        self.active = Some(ActiveRoute { handle, waypoints: pending.waypoints, summary });
        self.state = SessionState::Active;
    }

    /// Routing service failure: report and fall back; no retry loop
    pub(crate) fn handle_route_failed(&mut self, token: u64, reason: &str) {
        if !self.pending_matches(token) {
            self.metrics.record_stale_result_discarded();
            debug!(token = %token, "stale_route_failure_discarded");
            return;
        }
        self.pending = None;

        warn!(token = %token, reason = %reason, "route_request_failed");
        self.map.send(MapCommand::warn(format!("Route computation failed: {reason}")));
        self.state = self.fallback_state();
    }

    /// Navigate is only meaningful with a rendered route
    pub(crate) fn handle_navigate(&mut self) {
        if self.state == SessionState::Active {
            self.map.send(MapCommand::info("Navigation started!"));
            if let Some(active) = self.active.as_ref() {
                info!(
                    handle = %active.handle,
                    distance_m = %active.summary.distance_meters,
                    "navigation_started"
                );
            }
        } else {
            self.map.send(MapCommand::warn("Set a route first!"));
        }
    }

    /// Recenter is independent of the route lifecycle, it only needs a fix
    pub(crate) fn handle_recenter(&mut self) {
        match self.current_position {
            Some(position) => {
                self.map.send(MapCommand::SetViewCenter {
                    lat: position.coordinates.latitude,
                    lon: position.coordinates.longitude,
                    zoom: self.config.recenter_zoom(),
                });
            }
            None => {
                self.map.send(MapCommand::warn("Current location not available yet."));
            }
        }
    }

    fn pending_matches(&self, token: u64) -> bool {
        self.pending.as_ref().map(|p| p.token) == Some(token)
    }

    /// Where a failed or unsendable request lands: back on the still-rendered
    /// route if there is one, otherwise `Ready` for the next operator action
    fn fallback_state(&self) -> SessionState {
        if self.active.is_some() {
            SessionState::Active
        } else {
            SessionState::Ready
        }
    }

    fn new_handle(&mut self) -> RouteHandle {
        let handle = RouteHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    #[cfg(test)]
    pub(crate) fn pending_waypoints(&self) -> Option<&crate::domain::route::Waypoints> {
        self.pending.as_ref().map(|p| &p.waypoints)
    }

    #[cfg(test)]
    pub(crate) fn active_waypoints(&self) -> Option<&crate::domain::route::Waypoints> {
        self.active.as_ref().map(|a| &a.waypoints)
    }
}
