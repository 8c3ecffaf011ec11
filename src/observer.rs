//! Hooks the pool reports lifecycle events to.
//!
//! Workers never print. Every state transition, task start/finish and
//! trapped panic goes through a [`PoolObserver`], so embedding code can
//! route them to its own logging or assertions. [`TracingObserver`] is the
//! default and emits `tracing` events; [`NoopObserver`] discards everything.

use crate::executor::{TaskId, WorkerId, WorkerState};
use std::time::Duration;

/// Receives pool lifecycle events. All methods default to doing nothing.
///
/// Called from worker threads, so implementations must be cheap and must
/// not block for long: a slow observer stalls the worker that called it.
pub trait PoolObserver: Send + Sync + 'static {
    fn on_worker_state(&self, _worker: WorkerId, _state: WorkerState) {}

    fn on_task_start(&self, _worker: WorkerId, _task: TaskId) {}

    fn on_task_finish(&self, _worker: WorkerId, _task: TaskId, _elapsed: Duration) {}

    fn on_task_panic(&self, _worker: WorkerId, _task: TaskId, _message: &str) {}

    fn on_abort(&self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PoolObserver for NoopObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PoolObserver for TracingObserver {
    fn on_worker_state(&self, worker: WorkerId, state: WorkerState) {
        tracing::trace!(worker, ?state, "worker state changed");
    }

    fn on_task_start(&self, worker: WorkerId, task: TaskId) {
        tracing::debug!(worker, task = task.as_u64(), "executing task");
    }

    fn on_task_finish(&self, worker: WorkerId, task: TaskId, elapsed: Duration) {
        tracing::debug!(
            worker,
            task = task.as_u64(),
            elapsed_us = elapsed.as_micros() as u64,
            "task finished"
        );
    }

    fn on_task_panic(&self, worker: WorkerId, task: TaskId, message: &str) {
        tracing::warn!(worker, task = task.as_u64(), reason = message, "task panicked");
    }

    fn on_abort(&self) {
        tracing::info!("pool aborted");
    }
}
