//! Micro-operation benchmarks for SafeMap in both order modes.
//!
//! Run with: `cargo bench --bench ops`
//!
//! Measures single-threaded per-operation latency for load, store, add and
//! range_delete, so the cost of the insertion-order record shows up as the
//! gap between the `unordered` and `ordered` rows.

use std::hint::black_box;
use std::time::Instant;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use safemap::builder::OrderMode;
use safemap::map::{SafeMap, Visit};

const KEYS: u64 = 16_384;
const OPS: u64 = 100_000;

const MODES: [(&str, OrderMode); 2] = [
    ("unordered", OrderMode::Unordered),
    ("ordered", OrderMode::InsertionOrder),
];

fn filled(mode: OrderMode) -> SafeMap<u64, u64> {
    let map = SafeMap::with_capacity(mode, KEYS as usize);
    for i in 0..KEYS {
        map.store(i, i);
    }
    map
}

fn random_keys(count: u64, universe: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(42);
    (0..count).map(|_| rng.random_range(0..universe)).collect()
}

// ============================================================================
// Load Latency (ns/op)
// ============================================================================

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_ns");
    group.throughput(Throughput::Elements(OPS));
    // Half the lookups miss.
    let keys = random_keys(OPS, KEYS * 2);

    for (name, mode) in MODES {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_custom(|iters| {
                let map = filled(mode);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in &keys {
                        black_box(map.load(key));
                    }
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Store Latency (ns/op)
// ============================================================================

fn bench_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_ns");
    group.throughput(Throughput::Elements(OPS));
    let keys = random_keys(OPS, KEYS * 4);

    for (name, mode) in MODES {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_custom(|iters| {
                let map = SafeMap::with_mode(mode);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in &keys {
                        map.store(*key, *key);
                    }
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Add Latency (ns/op)
// ============================================================================

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_ns");
    group.throughput(Throughput::Elements(OPS));
    let keys = random_keys(OPS, KEYS);

    for (name, mode) in MODES {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_custom(|iters| {
                let map: SafeMap<u64, u64> = SafeMap::with_mode(mode);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in &keys {
                        map.add(*key, 1);
                    }
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Store / Delete Churn (ns/op)
// ============================================================================

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_ns");
    group.throughput(Throughput::Elements(OPS));
    let keys = random_keys(OPS, KEYS);

    for (name, mode) in MODES {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_custom(|iters| {
                let map = filled(mode);
                let start = Instant::now();
                for _ in 0..iters {
                    for key in &keys {
                        if map.load_and_delete(key).is_none() {
                            map.store(*key, *key);
                        }
                    }
                }
                start.elapsed()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Range Delete Sweep (full pass)
// ============================================================================

fn bench_range_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_delete_sweep");
    group.throughput(Throughput::Elements(KEYS));

    for (name, mode) in MODES {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter_batched(
                || filled(mode),
                |map| {
                    let removed = map.range_delete(|_, v| {
                        if v % 4 == 0 {
                            Visit::Delete
                        } else {
                            Visit::Continue
                        }
                    });
                    black_box(removed)
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_load,
    bench_store,
    bench_add,
    bench_churn,
    bench_range_delete
);
criterion_main!(benches);
