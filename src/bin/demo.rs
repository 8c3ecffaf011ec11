//! Sample run: submit paced batches of sleeping tasks, then abort the pool.

use anyhow::Result;
use clap::Parser;
use std::thread;
use std::time::Duration;
use taskpool::{Config, Task, WorkerPool};

#[derive(Parser, Debug)]
#[command(name = "taskpool-demo", about = "Run sample tasks on a fixed worker pool")]
struct Cli {
    /// Number of worker threads
    #[arg(short, long, default_value_t = 4)]
    workers: usize,

    /// Number of batches to submit
    #[arg(short, long, default_value_t = 10)]
    batches: usize,

    /// Tasks per batch
    #[arg(long, default_value_t = 2)]
    batch_size: usize,

    /// Pause between batches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Sleep inside each task, in milliseconds
    #[arg(long, default_value_t = 10)]
    task_delay_ms: u64,

    /// Wait after the last batch before aborting, in milliseconds
    #[arg(long, default_value_t = 5000)]
    abort_after_ms: u64,
}

struct SampleTask {
    x: usize,
    delay: Duration,
}

impl Task for SampleTask {
    fn run(self) {
        thread::sleep(self.delay);
        let current = thread::current();
        tracing::info!(
            thread = current.name().unwrap_or("unnamed"),
            x = self.x,
            "sample task executed"
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taskpool=info".parse()?)
                .add_directive("taskpool_demo=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::builder().num_threads(cli.workers).build()?;
    let pool = WorkerPool::<SampleTask>::with_config(&config)?;

    let delay = Duration::from_millis(cli.task_delay_ms);
    for _ in 0..cli.batches {
        for x in 1..=cli.batch_size {
            pool.submit(SampleTask { x, delay });
        }
        thread::sleep(Duration::from_millis(cli.interval_ms));
    }

    thread::sleep(Duration::from_millis(cli.abort_after_ms));
    tracing::info!("sending abort signal");
    pool.abort();
    let metrics = pool.metrics();
    pool.join()?;

    tracing::info!(
        submitted = metrics.tasks_submitted,
        started = metrics.tasks_started,
        abandoned = metrics.not_started(),
        "pool stopped"
    );

    Ok(())
}
