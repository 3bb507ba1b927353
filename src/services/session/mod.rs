//! Route session - the central state machine
//!
//! The session combines the live position, the operator's selection, and the
//! routing service into one lifecycle: it decides when to (re)request a
//! route, owns the active route control, and drives the map front-end. All
//! inputs arrive as `SessionEvent`s on a single bounded channel and are
//! processed to completion one at a time, so transition ordering is explicit
//! and there are no data races to reason about.
//!
//! In-flight requests carry a monotonically increasing token; a result whose
//! token no longer matches the pending request is discarded, so only the
//! latest selection's route is ever rendered.

mod handlers;

use crate::domain::route::{RouteSummary, Waypoints};
use crate::domain::types::{Position, RouteHandle, SessionEvent};
use crate::domain::Selection;
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::map::MapCommandSender;
use crate::services::catalog::LocationStore;
use crate::services::route_worker::RouteQuery;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No selection, no active route
    Idle,
    /// Selection set, waiting for the first position fix
    AwaitingPosition,
    /// Selection and position available, no request in flight
    Ready,
    /// A route computation is in flight
    Requesting,
    /// A route is currently rendered
    Active,
}

/// The request currently in flight
#[derive(Debug)]
pub(crate) struct PendingRequest {
    pub(crate) token: u64,
    pub(crate) waypoints: Waypoints,
}

/// The route currently rendered on the map
#[derive(Debug)]
pub(crate) struct ActiveRoute {
    pub(crate) handle: RouteHandle,
    pub(crate) waypoints: Waypoints,
    pub(crate) summary: RouteSummary,
}

/// Central state machine for the route session
pub struct RouteSession {
    /// Immutable-per-session catalog of known locations
    pub(crate) store: LocationStore,
    pub(crate) state: SessionState,
    /// Current selection (empty exactly in `Idle` and before first input)
    pub(crate) selection: Selection,
    /// Latest observed position; each new fix supersedes the prior one
    pub(crate) current_position: Option<Position>,
    pub(crate) pending: Option<PendingRequest>,
    pub(crate) active: Option<ActiveRoute>,
    /// Monotonic request token source
    pub(crate) next_token: u64,
    /// Monotonic route control handle source
    pub(crate) next_handle: u64,
    pub(crate) map: MapCommandSender,
    pub(crate) route_tx: mpsc::Sender<RouteQuery>,
    pub(crate) config: Config,
    pub(crate) metrics: Arc<Metrics>,
}

impl RouteSession {
    pub fn new(
        config: Config,
        map: MapCommandSender,
        route_tx: mpsc::Sender<RouteQuery>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            store: LocationStore::new(),
            state: SessionState::Idle,
            selection: Selection::default(),
            current_position: None,
            pending: None,
            active: None,
            next_token: 1,
            next_handle: 1,
            map,
            route_tx,
            config,
            metrics,
        }
    }

    /// Consume events until the channel closes
    pub async fn run(&mut self, mut event_rx: mpsc::Receiver<SessionEvent>) {
        while let Some(event) = event_rx.recv().await {
            self.process_event(event);
        }
    }

    /// Process a single event, dispatching to the appropriate handler.
    ///
    /// Handlers are synchronous: side effects go out through non-blocking
    /// channel sends, so each event is fully applied before the next one.
    pub fn process_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::CatalogLoaded(locations) => {
                self.handle_catalog_loaded(locations);
            }
            SessionEvent::PositionObserved(position) => {
                self.handle_position_observed(position);
            }
            SessionEvent::PositionLost(reason) => {
                self.handle_position_lost(&reason);
            }
            SessionEvent::SelectionChanged(raw) => {
                self.handle_selection_changed(&raw);
            }
            SessionEvent::RouteResolved { token, summary } => {
                self.handle_route_resolved(token, summary);
            }
            SessionEvent::RouteFailed { token, reason } => {
                self.handle_route_failed(token, &reason);
            }
            SessionEvent::Recenter => {
                self.handle_recenter();
            }
            SessionEvent::Navigate => {
                self.handle_navigate();
            }
        }

        self.metrics.record_event_processed();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn has_active_route(&self) -> bool {
        self.active.is_some()
    }
}
