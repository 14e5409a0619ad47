//! Benchmarks for `BPlusTree` using criterion.
//!
//! Run with: `cargo bench --bench bplus_tree`

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use leafchain::{BPlusTree, RowId};

const N: u64 = 10_000;
const DEGREES: &[usize] = &[2, 8, 32];

/// Deterministic permutation of `0..n` (multiplier coprime to `n`).
fn shuffled(n: u64) -> Vec<u64> {
    (0..n).map(|i| (i * 7919 + 13) % n).collect()
}

fn build(degree: usize, keys: &[u64]) -> BPlusTree<u64> {
    let mut tree = BPlusTree::new(degree).unwrap();
    tree.init_root();
    for &k in keys {
        tree.insert(k, RowId::new(k)).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplus_tree/insert");
    group.throughput(Throughput::Elements(N));

    let sequential: Vec<u64> = (0..N).collect();
    let random = shuffled(N);

    for &degree in DEGREES {
        group.bench_with_input(BenchmarkId::new("sequential", degree), &degree, |b, &d| {
            b.iter(|| black_box(build(d, &sequential)));
        });
        group.bench_with_input(BenchmarkId::new("random", degree), &degree, |b, &d| {
            b.iter(|| black_box(build(d, &random)));
        });
    }

    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplus_tree/delete");
    group.throughput(Throughput::Elements(N));

    let keys = shuffled(N);

    for &degree in DEGREES {
        let tree = build(degree, &keys);
        group.bench_with_input(BenchmarkId::new("random", degree), &degree, |b, _| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| {
                    for k in &keys {
                        black_box(tree.delete(k).unwrap());
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("bplus_tree/lookup");

    let keys = shuffled(N);

    for &degree in DEGREES {
        let tree = build(degree, &keys);

        group.throughput(Throughput::Elements(N));
        group.bench_with_input(BenchmarkId::new("get", degree), &degree, |b, _| {
            b.iter(|| {
                for k in &keys {
                    black_box(tree.get(black_box(k)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("scan", degree), &degree, |b, _| {
            b.iter(|| black_box(tree.iter().count()));
        });

        group.throughput(Throughput::Elements(100));
        group.bench_with_input(BenchmarkId::new("range_100", degree), &degree, |b, _| {
            b.iter(|| black_box(tree.range(black_box(N / 2)..N / 2 + 100).count()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_delete, bench_lookup);
criterion_main!(benches);
