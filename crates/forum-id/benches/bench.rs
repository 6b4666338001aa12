use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use forum_id::{
    CancellationToken, CursorWindow, Generator, GeneratorAsyncExt, Identifier,
    IdentifierGenerator, Layout, MemoryStore, MonotonicClock, Poll, SliceQuery, TimeSource,
    TokenGenerator, TokioSleep, codec,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of values generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn benchmark_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    let value = u128::from(0x0123_4567_89AB_CDEF_u64);
    group.bench_function("encode/11", |b| {
        b.iter(|| codec::encode(black_box(value), 11).unwrap());
    });

    let mut buf = [0_u8; Identifier::ENCODED_LEN];
    group.bench_function("encode_to_slice/11", |b| {
        b.iter(|| codec::encode_to_slice(black_box(value), &mut buf).unwrap());
    });

    let cursor = Identifier::from_raw(0x0123_4567_89AB_CDEF).to_string();
    group.bench_function("parse/11", |b| {
        b.iter(|| Identifier::parse(black_box(&cursor)).unwrap());
    });

    group.finish();
}

/// Hot path with a fixed clock; the default layout has 4096 counter values
/// per tick so every poll is `Ready`.
fn benchmark_mock_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock/sequential/identifier");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = IdentifierGenerator::new(FixedMockTime { millis: 1 });
                for _ in 0..TOTAL_IDS {
                    match generator.poll_next().unwrap() {
                        Poll::Ready { value } => {
                            black_box(value);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

fn benchmark_mono_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono/sequential/identifier");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let clock = MonotonicClock::default();
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = IdentifierGenerator::new(clock.clone());
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Shared generator across threads, sleeping on `Pending`.
fn benchmark_mono_threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono/threaded/identifier");

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            let clock = MonotonicClock::default();
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(IdentifierGenerator::new(clock.clone()));
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_mono_session_tokens(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono/sequential/session_token");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let tokens = TokenGenerator::session(MonotonicClock::default()).unwrap();
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(tokens.next().unwrap());
            }
        });
    });

    group.finish();
}

/// A single async generator on one Tokio worker.
fn benchmark_mono_sequential_tokio(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono/sequential/tokio/identifier");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();
        let clock = MonotonicClock::default();

        b.to_async(&rt).iter_custom(|iters| {
            let clock = clock.clone();
            async move {
                let cancel = CancellationToken::new();
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = IdentifierGenerator::new(clock.clone());
                    for _ in 0..TOTAL_IDS {
                        let id = generator.next_async::<TokioSleep>(&cancel).await.unwrap();
                        black_box(id);
                    }
                }

                start.elapsed()
            }
        });
    });

    group.finish();
}

fn benchmark_pagination(c: &mut Criterion) {
    const ROWS: u64 = 100_000;
    const LIMIT: usize = 50;

    let layout = Layout::DEFAULT;
    let store: MemoryStore<Identifier> = (1..=ROWS).map(|tick| layout.pack(tick, 0, 0)).collect();
    let window = CursorWindow::with_max_limit(100);
    let middle = layout.pack(ROWS / 2, 0, 0).to_string();

    let mut group = c.benchmark_group("pagination/memory");
    group.throughput(Throughput::Elements(LIMIT as u64));

    group.bench_function("after/newest", |b| {
        let query = SliceQuery::after("", LIMIT);
        b.iter(|| black_box(window.fetch(&store, &query).unwrap()));
    });

    group.bench_function("after/middle", |b| {
        let query = SliceQuery::after(middle.clone(), LIMIT);
        b.iter(|| black_box(window.fetch(&store, &query).unwrap()));
    });

    group.bench_function("before/middle", |b| {
        let query = SliceQuery::before(middle.clone(), LIMIT);
        b.iter(|| black_box(window.fetch(&store, &query).unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_codec,
    // Mock clock
    benchmark_mock_sequential,
    // Monotonic clock (sleeping on exhausted windows)
    benchmark_mono_sequential,
    benchmark_mono_threaded,
    benchmark_mono_session_tokens,
    // Async single worker
    benchmark_mono_sequential_tokio,
    // Cursor windows
    benchmark_pagination,
);
criterion_main!(benches);
