//! Criterion micro-benchmarks for arena push, reset, and reserve.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tessera_arena::{AdapterKind, Arena, ArenaConfig};
use tessera_bench::{mixed_sizes, small_objects};

const BACKENDS: [AdapterKind; 2] = [AdapterKind::Chained, AdapterKind::Contiguous];

/// Benchmark: create an arena and run a whole workload into it.
fn bench_workloads_cold(c: &mut Criterion) {
    for base in [small_objects(42), mixed_sizes(42)] {
        for kind in BACKENDS {
            let workload = base.clone().on(kind);
            let name = format!("{}_cold_{:?}", workload.name, kind).to_lowercase();
            c.bench_function(&name, |b| {
                b.iter(|| {
                    let mut arena = workload.arena().unwrap();
                    black_box(workload.run(&mut arena).unwrap());
                });
            });
        }
    }
}

/// Benchmark: rerun a workload into a warmed arena after reset, so no
/// backing memory is allocated inside the measured loop.
fn bench_workloads_warm(c: &mut Criterion) {
    for base in [small_objects(42), mixed_sizes(42)] {
        for kind in BACKENDS {
            let workload = base.clone().on(kind);
            let mut arena = workload.arena().unwrap();
            workload.run(&mut arena).unwrap();
            let name = format!("{}_warm_{:?}", workload.name, kind).to_lowercase();
            c.bench_function(&name, |b| {
                b.iter(|| {
                    arena.reset().unwrap();
                    black_box(workload.run(&mut arena).unwrap());
                });
            });
        }
    }
}

/// Benchmark: zero-filled 256-byte pushes on a reused arena.
fn bench_push_zero(c: &mut Criterion) {
    let mut arena = Arena::create(ArenaConfig::new().with_initial_pages(64)).unwrap();
    c.bench_function("push_zero_256", |b| {
        b.iter(|| {
            if arena.allocated() + 256 > arena.capacity() {
                arena.reset().unwrap();
            }
            black_box(arena.push_zero(256).unwrap());
        });
    });
}

/// Benchmark: reserve 1 MiB up front, then fill it.
fn bench_reserve_then_fill(c: &mut Criterion) {
    c.bench_function("reserve_1mib_then_fill", |b| {
        b.iter(|| {
            let mut arena = Arena::create(ArenaConfig::new().with_initial_pages(0)).unwrap();
            arena.reserve(1 << 20).unwrap();
            for _ in 0..(1 << 20) / 4096 {
                black_box(arena.push(4096).unwrap());
            }
            black_box(arena.capacity());
        });
    });
}

criterion_group!(
    benches,
    bench_workloads_cold,
    bench_workloads_warm,
    bench_push_zero,
    bench_reserve_then_fill
);
criterion_main!(benches);
