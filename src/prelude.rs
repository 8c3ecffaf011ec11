pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{PanicStrategy, Task, TaskId, WorkerPool, WorkerState};
pub use crate::observer::{NoopObserver, PoolObserver, TracingObserver};
pub use crate::queue::TaskQueue;
pub use crate::telemetry::MetricsSnapshot;
