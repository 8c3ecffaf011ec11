//! Pool telemetry.
//!
//! Counters and latency figures a pool keeps about the tasks it runs.
//! Snapshots are cheap and can be taken from any thread.

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
