//! Route worker - keeps routing-service network I/O off the session loop
//!
//! The session enqueues token-tagged queries via an mpsc channel; the worker
//! performs the HTTP call and feeds the outcome back into the session event
//! queue. Queries are processed one at a time, so at most one request is in
//! flight; superseded results are discarded by the session's token check.

use crate::domain::route::Waypoints;
use crate::domain::types::SessionEvent;
use crate::infra::metrics::Metrics;
use crate::io::router::RouterClient;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// A route computation request
#[derive(Debug)]
pub struct RouteQuery {
    /// Monotonic request token; stale results are dropped at resolution time
    pub token: u64,
    /// Position first, then selected locations in selection order
    pub waypoints: Waypoints,
    /// When the query was enqueued (for queue delay measurement)
    pub enqueued_at: Instant,
}

/// Worker that resolves route queries asynchronously
pub struct RouteWorker {
    router: Arc<RouterClient>,
    query_rx: mpsc::Receiver<RouteQuery>,
    event_tx: mpsc::Sender<SessionEvent>,
    metrics: Arc<Metrics>,
}

impl RouteWorker {
    pub fn new(
        router: Arc<RouterClient>,
        query_rx: mpsc::Receiver<RouteQuery>,
        event_tx: mpsc::Sender<SessionEvent>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self { router, query_rx, event_tx, metrics }
    }

    /// Run the worker, processing queries until shutdown or channel close
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("route_worker_started");

        loop {
            let query = tokio::select! {
                query = self.query_rx.recv() => match query {
                    Some(query) => query,
                    None => break,
                },
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };

            let queue_delay_us = query.enqueued_at.elapsed().as_micros() as u64;
            let compute_start = Instant::now();

            let event = match self.router.compute(&query.waypoints).await {
                Ok(summary) => {
                    info!(
                        token = %query.token,
                        waypoints = %query.waypoints.len(),
                        queue_delay_us = %queue_delay_us,
                        compute_ms = %compute_start.elapsed().as_millis(),
                        distance_m = %summary.distance_meters,
                        duration_s = %summary.duration_seconds,
                        "route_computed"
                    );
                    self.metrics.record_route_completed();
                    SessionEvent::RouteResolved { token: query.token, summary }
                }
                Err(e) => {
                    warn!(
                        token = %query.token,
                        waypoints = %query.waypoints.len(),
                        error = %e,
                        "route_computation_failed"
                    );
                    self.metrics.record_route_failed();
                    SessionEvent::RouteFailed { token: query.token, reason: e.to_string() }
                }
            };

            if self.event_tx.send(event).await.is_err() {
                break;
            }
        }

        info!("route_worker_stopped");
    }
}

/// Create a route query channel and worker
///
/// Returns the sender (for the session) and the worker (to be spawned)
pub fn create_route_worker(
    router: Arc<RouterClient>,
    event_tx: mpsc::Sender<SessionEvent>,
    metrics: Arc<Metrics>,
    buffer_size: usize,
) -> (mpsc::Sender<RouteQuery>, RouteWorker) {
    let (query_tx, query_rx) = mpsc::channel(buffer_size);
    let worker = RouteWorker::new(router, query_rx, event_tx, metrics);
    (query_tx, worker)
}
