//! taskpool - a fixed-size worker thread pool
//!
//! A set of worker threads, fixed at construction, pulls tasks from one
//! shared blocking FIFO queue and runs them until the pool is aborted.
//!
//! # Quick Start
//!
//! ```no_run
//! use taskpool::prelude::*;
//!
//! let pool = WorkerPool::new(4)?;
//!
//! for i in 0..8 {
//!     pool.execute(move || println!("task {}", i));
//! }
//!
//! // abort, then wait for every worker to exit
//! pool.join()?;
//! # Ok::<(), taskpool::Error>(())
//! ```
//!
//! # Semantics
//!
//! - **FIFO**: tasks submitted from one thread start in submission order.
//! - **One-shot abort**: `abort` stops every worker; queued tasks that have
//!   not started are abandoned, running ones finish.
//! - **Join on drop**: dropping the pool aborts it and waits for the workers.
//! - **Panic trapping**: a panicking task is reported and the worker keeps
//!   going.
//! - **Unbounded queue**: `submit` never blocks; add your own bound if you
//!   need backpressure.

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod observer;
pub mod prelude;
pub mod queue;
pub mod telemetry;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{BoxedTask, PanicStrategy, Task, TaskId, WorkerPool, WorkerState, WorkerStats};
pub use observer::{NoopObserver, PoolObserver, TracingObserver};
pub use queue::TaskQueue;
pub use telemetry::MetricsSnapshot;
