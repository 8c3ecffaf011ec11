use super::panic_handler::{PanicHandler, PanicInfo};
use super::task::{BoxedTask, Job, Task, TaskId};
use super::worker::{Worker, WorkerId, WorkerState, WorkerStats, WorkerStatus};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::observer::{PoolObserver, TracingObserver};
use crate::queue::TaskQueue;
use crate::telemetry::{Metrics, MetricsSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A fixed set of worker threads draining one shared FIFO queue.
///
/// The worker count is decided at construction and never changes. Tasks
/// start in submission order (per producer) on whichever worker is free.
///
/// # Shutdown
///
/// [`abort`](Self::abort) is one-way: once called, no further task starts,
/// and tasks still queued are abandoned rather than drained. A task that is
/// already running finishes normally. Submitting after abort is accepted
/// silently; the task is queued but will never run.
///
/// Dropping the pool aborts it and then joins every worker, so no worker
/// outlives the pool. A task that never returns therefore makes the drop
/// (or [`join`](Self::join)) block forever.
pub struct WorkerPool<T: Task = BoxedTask> {
    workers: Vec<WorkerHandle>,
    queue: Arc<TaskQueue<Job<T>>>,
    shutdown: Arc<AtomicBool>,
    metrics: Arc<Metrics>,
    observer: Arc<dyn PoolObserver>,
    num_threads: usize,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
    status: Arc<WorkerStatus>,
}

impl WorkerPool<BoxedTask> {
    /// Start a pool of `num_threads` workers running boxed closures.
    ///
    /// Fails with a config error when `num_threads` is zero.
    pub fn new(num_threads: usize) -> Result<Self> {
        Self::with_config(&Config::with_threads(num_threads))
    }

    /// Box `f` and submit it.
    pub fn execute<F>(&self, f: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Box::new(f))
    }
}

impl<T: Task> WorkerPool<T> {
    pub fn with_config(config: &Config) -> Result<Self> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    pub fn with_observer(config: &Config, observer: Arc<dyn PoolObserver>) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();

        let queue = Arc::new(TaskQueue::new());
        let shutdown = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(Metrics::new()?);
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));

        let mut pool = Self {
            workers: Vec::with_capacity(num_threads),
            queue,
            shutdown,
            metrics,
            observer,
            num_threads,
        };

        for id in 0..num_threads {
            let status = Arc::new(WorkerStatus::new());
            let worker = Worker {
                id,
                queue: pool.queue.clone(),
                shutdown: pool.shutdown.clone(),
                status: status.clone(),
                panic_handler: panic_handler.clone(),
                metrics: pool.metrics.clone(),
                observer: pool.observer.clone(),
            };

            let mut builder =
                thread::Builder::new().name(format!("{}-{}", config.thread_name_prefix, id));
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            // on failure `pool` drops here, which stops the workers already spawned
            let thread = builder.spawn(move || worker.run())?;

            pool.workers.push(WorkerHandle {
                id,
                thread: Some(thread),
                status,
            });
        }

        tracing::debug!(num_threads, prefix = %config.thread_name_prefix, "worker pool started");

        Ok(pool)
    }

    /// Queue `task` for execution. Never blocks.
    ///
    /// After [`abort`](Self::abort) the task is still queued but never runs.
    pub fn submit(&self, task: T) -> TaskId {
        let job = Job::new(task);
        let id = job.id;
        self.metrics.record_submit();
        self.queue.push(job);
        id
    }

    /// Stop the pool. Idempotent and safe to call from several threads.
    ///
    /// Returns without waiting for workers; use [`join`](Self::join) or drop
    /// the pool to wait for them.
    pub fn abort(&self) {
        if !self.shutdown.swap(true, Ordering::AcqRel) {
            self.observer.on_abort();
        }
        self.queue.abort();
    }

    pub fn is_aborted(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Abort the pool and wait for every worker to exit.
    ///
    /// Reports the first worker whose thread died outside of task
    /// execution, after all workers have been joined.
    pub fn join(mut self) -> Result<()> {
        self.abort();
        self.join_workers()
    }

    fn join_workers(&mut self) -> Result<()> {
        let mut first_err = None;
        let current = thread::current().id();

        for worker in &mut self.workers {
            let Some(thread) = worker.thread.take() else {
                continue;
            };

            // the pool is being dropped from inside one of its own tasks
            if thread.thread().id() == current {
                continue;
            }

            if let Err(payload) = thread.join() {
                let info = PanicInfo::from_payload(payload);
                tracing::error!(worker = worker.id, reason = %info.message, "worker thread panicked");
                first_err.get_or_insert(Error::worker_panic(worker.id, info.message));
            }
        }

        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Tasks queued and not yet picked up by a worker.
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.workers.iter().map(|w| w.status.state()).collect()
    }

    pub fn worker_stats(&self) -> Vec<WorkerStats> {
        self.workers
            .iter()
            .map(|w| WorkerStats::read(w.id, &w.status))
            .collect()
    }

    /// Hand back the tasks an abort left in the queue, oldest first.
    ///
    /// Returns nothing while the pool is still running.
    pub fn take_abandoned(&self) -> Vec<T> {
        if !self.is_aborted() {
            return Vec::new();
        }
        self.queue.drain().into_iter().map(|job| job.task).collect()
    }
}

impl<T: Task> std::fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads)
            .field("aborted", &self.is_aborted())
            .field("pending_tasks", &self.pending_tasks())
            .finish()
    }
}

impl<T: Task> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        // abort first: joining a worker still blocked in the queue never returns
        self.abort();
        let _ = self.join_workers();
    }
}
