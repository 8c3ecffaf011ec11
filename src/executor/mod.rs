//! Task execution infrastructure.
//!
//! This module provides the worker pool, the worker loop it runs on each
//! thread, and the panic trapping that keeps a bad task from taking a
//! worker down with it.

pub mod panic_handler;
pub mod pool;
pub mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::WorkerPool;
pub use task::{BoxedTask, Task, TaskId};
pub use worker::{WorkerId, WorkerState, WorkerStats};

pub(crate) use task::Job;
