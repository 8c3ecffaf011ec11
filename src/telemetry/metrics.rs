//! Task counters and execution-latency histogram for a pool.

use crate::error::{Error, Result};
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Largest latency the histogram tracks: one hour in nanoseconds.
const MAX_TRACKED_LATENCY_NS: u64 = 3_600_000_000_000;

/// Pool metrics collector
#[derive(Debug)]
pub struct Metrics {
    tasks_submitted: AtomicU64,
    tasks_started: AtomicU64,
    tasks_completed: AtomicU64,
    tasks_panicked: AtomicU64,

    // execution time of every task that returned or panicked
    latency_histogram: RwLock<Histogram<u64>>,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let histogram = Histogram::new_with_max(MAX_TRACKED_LATENCY_NS, 3)
            .map_err(|e| Error::config(format!("latency histogram: {}", e)))?;

        Ok(Self {
            tasks_submitted: AtomicU64::new(0),
            tasks_started: AtomicU64::new(0),
            tasks_completed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            latency_histogram: RwLock::new(histogram),
            start_time: Instant::now(),
        })
    }

    pub fn record_submit(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_start(&self) {
        self.tasks_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a task that ran to completion.
    pub fn record_completion(&self, elapsed: Duration) {
        self.tasks_completed.fetch_add(1, Ordering::Relaxed);
        self.record_latency(elapsed);
    }

    /// Record a task that panicked.
    pub fn record_panic(&self, elapsed: Duration) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
        self.record_latency(elapsed);
    }

    fn record_latency(&self, elapsed: Duration) {
        let ns = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.latency_histogram.write().saturating_record(ns);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let histogram = self.latency_histogram.read();
        let recorded = histogram.len() > 0;

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_started: self.tasks_started.load(Ordering::Relaxed),
            tasks_completed: self.tasks_completed.load(Ordering::Relaxed),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            avg_latency_ns: if recorded { histogram.mean() as u64 } else { 0 },
            p50_latency_ns: histogram.value_at_quantile(0.50),
            p99_latency_ns: histogram.value_at_quantile(0.99),
            max_latency_ns: histogram.max(),
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub tasks_submitted: u64,
    pub tasks_started: u64,
    pub tasks_completed: u64,
    pub tasks_panicked: u64,
    pub avg_latency_ns: u64,
    pub p50_latency_ns: u64,
    pub p99_latency_ns: u64,
    pub max_latency_ns: u64,
}

impl MetricsSnapshot {
    /// Tasks submitted but never picked up by a worker.
    ///
    /// After the pool is aborted and joined this is the number of tasks the
    /// abort abandoned.
    pub fn not_started(&self) -> u64 {
        self.tasks_submitted.saturating_sub(self.tasks_started)
    }

    /// Tasks a worker has picked up but not yet finished.
    pub fn in_flight(&self) -> u64 {
        self.tasks_started
            .saturating_sub(self.tasks_completed + self.tasks_panicked)
    }

    /// Calculate finished tasks per second of pool uptime
    pub fn tasks_per_second(&self) -> f64 {
        let seconds = self.uptime.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        (self.tasks_completed + self.tasks_panicked) as f64 / seconds
    }
}
