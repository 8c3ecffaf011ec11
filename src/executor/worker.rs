// worker thread stuff
use super::panic_handler::{PanicHandler, PanicInfo};
use super::task::{Job, Task};
use crate::observer::PoolObserver;
use crate::queue::TaskQueue;
use crate::telemetry::Metrics;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

pub type WorkerId = usize;

/// Where a worker is in its loop.
///
/// `Idle -> Running -> Idle` repeats until the pool aborts, then the worker
/// moves to `Stopped` and never leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WorkerState {
    /// Blocked in the queue waiting for a task.
    Idle = 0,
    /// Executing a dequeued task.
    Running = 1,
    /// Loop exited; the thread is finishing or gone.
    Stopped = 2,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerState::Idle,
            1 => WorkerState::Running,
            _ => WorkerState::Stopped,
        }
    }
}

// shared between the worker thread and its pool handle
#[derive(Debug)]
pub(crate) struct WorkerStatus {
    state: AtomicU8,
    tasks_executed: AtomicU64,
    tasks_panicked: AtomicU64,
}

impl WorkerStatus {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(WorkerState::Idle as u8),
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    pub fn tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }
}

/// Per-worker figures as seen from the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: WorkerId,
    pub state: WorkerState,
    /// Tasks this worker ran, panicked ones included.
    pub tasks_executed: u64,
    pub tasks_panicked: u64,
}

impl WorkerStats {
    pub(crate) fn read(id: WorkerId, status: &WorkerStatus) -> Self {
        Self {
            id,
            state: status.state(),
            tasks_executed: status.tasks_executed(),
            tasks_panicked: status.tasks_panicked(),
        }
    }
}

pub(crate) struct Worker<T> {
    pub id: WorkerId,
    pub queue: Arc<TaskQueue<Job<T>>>,
    pub shutdown: Arc<AtomicBool>,
    pub status: Arc<WorkerStatus>,
    pub panic_handler: Arc<PanicHandler>,
    pub metrics: Arc<Metrics>,
    pub observer: Arc<dyn PoolObserver>,
}

// marks the worker Stopped however the loop exits, unwinding included
struct StopGuard<'a>(&'a WorkerStatus);

impl Drop for StopGuard<'_> {
    fn drop(&mut self) {
        self.0.state.store(WorkerState::Stopped as u8, Ordering::Release);
    }
}

impl<T: Task> Worker<T> {
    // main loop
    pub fn run(self) {
        let _stop = StopGuard(&self.status);
        self.set_state(WorkerState::Idle);

        while !self.shutdown.load(Ordering::Acquire) {
            // None means the queue was aborted
            let Some(job) = self.queue.pop() else {
                break;
            };

            self.set_state(WorkerState::Running);
            self.execute_job(job);

            if self.shutdown.load(Ordering::Acquire) {
                break;
            }
            self.set_state(WorkerState::Idle);
        }

        self.set_state(WorkerState::Stopped);
    }

    fn execute_job(&self, job: Job<T>) {
        let task_id = job.id;
        self.metrics.record_start();
        self.notify("on_task_start", |o| o.on_task_start(self.id, task_id));

        let start = Instant::now();
        let result = self.panic_handler.execute(move || job.execute());
        let elapsed = start.elapsed();

        self.status.tasks_executed.fetch_add(1, Ordering::Relaxed);

        match result {
            Ok(()) => {
                self.metrics.record_completion(elapsed);
                self.notify("on_task_finish", |o| o.on_task_finish(self.id, task_id, elapsed));
            }
            Err(info) => {
                self.status.tasks_panicked.fetch_add(1, Ordering::Relaxed);
                self.metrics.record_panic(elapsed);
                self.notify("on_task_panic", |o| {
                    o.on_task_panic(self.id, task_id, &info.message)
                });
            }
        }
    }

    fn set_state(&self, state: WorkerState) {
        self.status.state.store(state as u8, Ordering::Release);
        self.notify("on_worker_state", |o| o.on_worker_state(self.id, state));
    }

    // observer code is not ours: a panic in a hook must not take the worker down
    fn notify(&self, hook: &'static str, f: impl FnOnce(&dyn PoolObserver)) {
        let observer = &*self.observer;
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| f(observer))) {
            let info = PanicInfo::from_payload(payload);
            tracing::error!(worker = self.id, hook, reason = %info.message, "observer panicked");
        }
    }
}
