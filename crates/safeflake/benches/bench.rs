use core::hint::black_box;
use criterion::async_executor::SmolExecutor;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::future::try_join_all;
use safeflake::{
    AtomicFlakeGenerator, BasicFlakeGenerator, FlakeGenerator, FlakeGeneratorAsyncExt,
    GeneratorConfig, LockFlakeGenerator, MonotonicClock, Poll, SmolSleep, TimeSource, TokioSleep,
};
use std::{
    sync::{
        Arc, Barrier,
        atomic::{AtomicU64, Ordering},
    },
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

const EPOCH: u64 = 1_583_843_696_123;

/// A clock that advances one millisecond every time it is read, so the
/// sequence never runs out.
struct TickingMockTime {
    millis: AtomicU64,
}

impl TimeSource for TickingMockTime {
    fn current_millis(&self) -> u64 {
        self.millis.fetch_add(1, Ordering::Relaxed)
    }
}

fn ticking() -> TickingMockTime {
    TickingMockTime {
        millis: AtomicU64::new(EPOCH),
    }
}

fn config() -> GeneratorConfig {
    GeneratorConfig::new(EPOCH).with_worker_id(1)
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: FlakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id() {
                        Ok(Poll::Ready { id }) => {
                            black_box(id);
                        }
                        Ok(Poll::Pending { .. }) | Err(_) => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks generators on a real clock, waiting out sequence exhaustion.
fn bench_generator_blocking<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: FlakeGenerator<MonotonicClock>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(
                        generator
                            .try_next_id(|_| core::hint::spin_loop())
                            .unwrap(),
                    );
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: FlakeGenerator<MonotonicClock> + Send + Sync,
{
    let threads = num_cpus::get().max(2);
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));

    group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let mut elapsed = core::time::Duration::ZERO;

            for _ in 0..iters {
                let generator = generator_factory();
                let barrier = Barrier::new(threads + 1);

                let start = scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            barrier.wait();
                            for _ in 0..TOTAL_IDS {
                                black_box(generator.generate_blocking().unwrap());
                            }
                        });
                    }
                    barrier.wait();
                    Instant::now()
                });

                elapsed += start.elapsed();
            }

            elapsed
        });
    });

    group.finish();
}

/// Benchmarks async generation with one generator per task.
fn bench_async_tokio(c: &mut Criterion) {
    const TASKS: usize = 8;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    let mut group = c.benchmark_group("async/tokio/lock");
    group.throughput(Throughput::Elements((TOTAL_IDS * TASKS) as u64));

    group.bench_function(format!("tasks/{TASKS}/elems/{TOTAL_IDS}"), |b| {
        b.to_async(&runtime).iter(|| async {
            let clock = MonotonicClock::new();
            let tasks = (0..TASKS as i64).map(|worker_id| {
                let generator = Arc::new(
                    LockFlakeGenerator::try_new(
                        GeneratorConfig::new(EPOCH).with_worker_id(worker_id),
                        clock.clone(),
                    )
                    .unwrap(),
                );
                tokio::spawn(async move {
                    for _ in 0..TOTAL_IDS {
                        black_box(
                            generator
                                .try_next_id_async::<TokioSleep>()
                                .await
                                .unwrap(),
                        );
                    }
                })
            });
            try_join_all(tasks).await.unwrap();
        });
    });

    group.finish();
}

/// Benchmarks async generation on smol.
fn bench_async_smol(c: &mut Criterion) {
    let mut group = c.benchmark_group("async/smol/atomic");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.to_async(SmolExecutor).iter(|| async {
            let generator =
                AtomicFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap();
            for _ in 0..TOTAL_IDS {
                black_box(
                    generator
                        .try_next_id_async::<SmolSleep>()
                        .await
                        .unwrap(),
                );
            }
        });
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let generator = BasicFlakeGenerator::try_new(config(), ticking()).unwrap();
    let id = generator.generate_blocking().unwrap();

    c.bench_function("parse", |b| {
        b.iter(|| black_box(generator.parse(black_box(id))));
    });
}

fn benches(c: &mut Criterion) {
    bench_generator(c, "mono/basic", || {
        BasicFlakeGenerator::try_new(config(), ticking()).unwrap()
    });
    bench_generator(c, "mono/lock", || {
        LockFlakeGenerator::try_new(config(), ticking()).unwrap()
    });
    bench_generator(c, "mono/atomic", || {
        AtomicFlakeGenerator::try_new(config(), ticking()).unwrap()
    });

    bench_generator_blocking(c, "clock/basic", || {
        BasicFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap()
    });
    bench_generator_blocking(c, "clock/lock", || {
        LockFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap()
    });
    bench_generator_blocking(c, "clock/atomic", || {
        AtomicFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap()
    });

    bench_generator_contended(c, "contended/lock", || {
        LockFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap()
    });
    bench_generator_contended(c, "contended/atomic", || {
        AtomicFlakeGenerator::try_new(config(), MonotonicClock::new()).unwrap()
    });

    bench_async_tokio(c);
    bench_async_smol(c);
    bench_parse(c);
}

criterion_group!(all, benches);
criterion_main!(all);
