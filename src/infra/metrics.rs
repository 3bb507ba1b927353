//! Lock-free session metrics
//!
//! Counters are plain relaxed atomics updated from the session loop and io
//! tasks, read periodically by the reporter task. No histograms here; the
//! session processes operator-scale event rates.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

#[derive(Debug, Default)]
pub struct Metrics {
    events_processed: AtomicU64,
    positions_observed: AtomicU64,
    selections_applied: AtomicU64,
    routes_requested: AtomicU64,
    routes_completed: AtomicU64,
    routes_failed: AtomicU64,
    stale_results_discarded: AtomicU64,
}

/// Point-in-time counter snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSummary {
    pub events_processed: u64,
    pub positions_observed: u64,
    pub selections_applied: u64,
    pub routes_requested: u64,
    pub routes_completed: u64,
    pub routes_failed: u64,
    pub stale_results_discarded: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            events = %self.events_processed,
            positions = %self.positions_observed,
            selections = %self.selections_applied,
            routes_requested = %self.routes_requested,
            routes_completed = %self.routes_completed,
            routes_failed = %self.routes_failed,
            stale_discarded = %self.stale_results_discarded,
            "metrics_summary"
        );
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event_processed(&self) {
        self.events_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_position_observed(&self) {
        self.positions_observed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_selection_applied(&self) {
        self.selections_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_route_requested(&self) {
        self.routes_requested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_route_completed(&self) {
        self.routes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_route_failed(&self) {
        self.routes_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_result_discarded(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSummary {
        MetricsSummary {
            events_processed: self.events_processed.load(Ordering::Relaxed),
            positions_observed: self.positions_observed.load(Ordering::Relaxed),
            selections_applied: self.selections_applied.load(Ordering::Relaxed),
            routes_requested: self.routes_requested.load(Ordering::Relaxed),
            routes_completed: self.routes_completed.load(Ordering::Relaxed),
            routes_failed: self.routes_failed.load(Ordering::Relaxed),
            stale_results_discarded: self.stale_results_discarded.load(Ordering::Relaxed),
        }
    }
}
