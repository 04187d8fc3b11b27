//! Lock-free reader metrics and periodic reporting
//!
//! NOTE: All atomics use Relaxed ordering intentionally. These are statistical
//! counters only and are never used for coordination. The report clock is
//! only touched by the reporter task.

use crate::domain::EventType;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Lock-free metrics collector shared between the poller and the reporter task
pub struct Metrics {
    /// Poll cycles completed, successful or not (monotonic)
    cycles_total: AtomicU64,
    /// Cycles since last report (reset on report)
    cycles_since_report: AtomicU64,
    departures_total: AtomicU64,
    arrivals_total: AtomicU64,
    /// Events the backend did not accept (non-2xx or transport failure)
    dispatch_failures_total: AtomicU64,
    /// Cycles aborted by an unexpected error
    cycle_errors_total: AtomicU64,
    /// Sum and max of dispatch latency (reset on report)
    dispatch_latency_sum_us: AtomicU64,
    dispatch_latency_max_us: AtomicU64,
    dispatches_since_report: AtomicU64,
    /// Last tag count observed by the reader (gauge)
    last_tag_count: AtomicU64,
    /// Start of the current reporting interval
    last_report: Mutex<Instant>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            cycles_total: AtomicU64::new(0),
            cycles_since_report: AtomicU64::new(0),
            departures_total: AtomicU64::new(0),
            arrivals_total: AtomicU64::new(0),
            dispatch_failures_total: AtomicU64::new(0),
            cycle_errors_total: AtomicU64::new(0),
            dispatch_latency_sum_us: AtomicU64::new(0),
            dispatch_latency_max_us: AtomicU64::new(0),
            dispatches_since_report: AtomicU64::new(0),
            last_tag_count: AtomicU64::new(0),
            last_report: Mutex::new(Instant::now()),
        }
    }

    #[inline]
    pub fn record_cycle(&self, tag_count: usize) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
        self.cycles_since_report.fetch_add(1, Ordering::Relaxed);
        self.last_tag_count.store(tag_count as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_cycle_error(&self) {
        self.cycles_total.fetch_add(1, Ordering::Relaxed);
        self.cycles_since_report.fetch_add(1, Ordering::Relaxed);
        self.cycle_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dispatch attempt with its outcome and latency
    pub fn record_dispatch(&self, event_type: EventType, delivered: bool, latency_us: u64) {
        match event_type {
            EventType::Departure => self.departures_total.fetch_add(1, Ordering::Relaxed),
            EventType::Arrival => self.arrivals_total.fetch_add(1, Ordering::Relaxed),
        };
        if !delivered {
            self.dispatch_failures_total.fetch_add(1, Ordering::Relaxed);
        }
        self.dispatches_since_report.fetch_add(1, Ordering::Relaxed);
        self.dispatch_latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.dispatch_latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    pub fn cycles_total(&self) -> u64 {
        self.cycles_total.load(Ordering::Relaxed)
    }

    pub fn departures_total(&self) -> u64 {
        self.departures_total.load(Ordering::Relaxed)
    }

    pub fn arrivals_total(&self) -> u64 {
        self.arrivals_total.load(Ordering::Relaxed)
    }

    pub fn dispatch_failures_total(&self) -> u64 {
        self.dispatch_failures_total.load(Ordering::Relaxed)
    }

    pub fn cycle_errors_total(&self) -> u64 {
        self.cycle_errors_total.load(Ordering::Relaxed)
    }

    /// Snapshot counters, resetting the per-interval ones
    pub fn report(&self) -> MetricsSummary {
        let now = Instant::now();
        let since = std::mem::replace(&mut *self.last_report.lock(), now);
        let elapsed_secs = now.duration_since(since).as_secs_f64();

        let cycles = self.cycles_since_report.swap(0, Ordering::Relaxed);
        let dispatches = self.dispatches_since_report.swap(0, Ordering::Relaxed);
        let latency_sum = self.dispatch_latency_sum_us.swap(0, Ordering::Relaxed);
        let latency_max = self.dispatch_latency_max_us.swap(0, Ordering::Relaxed);

        MetricsSummary {
            cycles_total: self.cycles_total(),
            cycles_per_sec: if elapsed_secs > 0.0 { cycles as f64 / elapsed_secs } else { 0.0 },
            departures_total: self.departures_total(),
            arrivals_total: self.arrivals_total(),
            dispatch_failures_total: self.dispatch_failures_total(),
            cycle_errors_total: self.cycle_errors_total(),
            avg_dispatch_latency_us: if dispatches > 0 { latency_sum / dispatches } else { 0 },
            max_dispatch_latency_us: latency_max,
            last_tag_count: self.last_tag_count.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub cycles_total: u64,
    pub cycles_per_sec: f64,
    pub departures_total: u64,
    pub arrivals_total: u64,
    pub dispatch_failures_total: u64,
    pub cycle_errors_total: u64,
    pub avg_dispatch_latency_us: u64,
    pub max_dispatch_latency_us: u64,
    pub last_tag_count: u64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            cycles_total = %self.cycles_total,
            cycles_per_sec = format!("{:.2}", self.cycles_per_sec),
            departures = %self.departures_total,
            arrivals = %self.arrivals_total,
            dispatch_failures = %self.dispatch_failures_total,
            cycle_errors = %self.cycle_errors_total,
            avg_dispatch_us = %self.avg_dispatch_latency_us,
            max_dispatch_us = %self.max_dispatch_latency_us,
            tags = %self.last_tag_count,
            "metrics"
        );
    }
}
