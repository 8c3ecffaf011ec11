//! Task representation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier assigned to a task at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A unit of work the pool can run.
///
/// Implemented for every `FnOnce() + Send + 'static` closure, so most
/// callers never name this trait. Implement it directly for a struct that
/// carries its own arguments.
pub trait Task: Send + 'static {
    fn run(self);
}

impl<F> Task for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self) {
        self()
    }
}

/// Type-erased task, the default payload of a pool.
pub type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// A submitted task plus its bookkeeping, as it sits in the queue.
pub(crate) struct Job<T> {
    pub(crate) id: TaskId,
    pub(crate) task: T,
    pub(crate) submit_time: Instant,
}

impl<T: Task> Job<T> {
    pub fn new(task: T) -> Self {
        Job {
            id: TaskId::next(),
            task,
            submit_time: Instant::now(),
        }
    }

    pub fn execute(self) {
        self.task.run();
    }
}

impl<T> std::fmt::Debug for Job<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("submit_time", &self.submit_time)
            .finish()
    }
}
