//! Benchmarks for submit-to-completion throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use taskpool::{Config, NoopObserver, WorkerPool};

const TASKS: usize = 10_000;

fn run_batch(pool: &WorkerPool, counter: &Arc<AtomicUsize>) {
    counter.store(0, Ordering::SeqCst);
    for i in 0..TASKS {
        let counter = counter.clone();
        pool.execute(move || {
            black_box(i * i);
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }
    while counter.load(Ordering::Relaxed) < TASKS {
        std::hint::spin_loop();
    }
}

fn bench_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_throughput");

    for workers in [1usize, 2, 4, 8] {
        let config = Config::builder().num_threads(workers).build().unwrap();
        let pool: WorkerPool = WorkerPool::with_observer(&config, Arc::new(NoopObserver)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| run_batch(&pool, &counter));
        });

        pool.join().unwrap();
    }

    group.finish();
}

criterion_group!(benches, bench_workers);
criterion_main!(benches);
