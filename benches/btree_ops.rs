//! Benchmarks for the core B+Tree operations across orders.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use bplusdb::BPlusTree;

const KEY_COUNT: u64 = 10_000;
const ORDERS: [usize; 4] = [4, 16, 64, 256];

fn shuffled_keys(seed: u64) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..KEY_COUNT).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}

fn build(order: usize, keys: &[u64]) -> BPlusTree<u64> {
    let mut tree = BPlusTree::new(order).expect("order");
    for &key in keys {
        tree.insert(key).expect("insert");
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree/insert");
    group.throughput(Throughput::Elements(KEY_COUNT));

    let keys = shuffled_keys(42);
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::new("random", order), &order, |b, &order| {
            b.iter(|| black_box(build(order, &keys)));
        });
    }

    let sequential: Vec<u64> = (0..KEY_COUNT).collect();
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::new("sequential", order), &order, |b, &order| {
            b.iter(|| black_box(build(order, &sequential)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree/search");
    group.throughput(Throughput::Elements(KEY_COUNT));

    let keys = shuffled_keys(7);
    let probes = shuffled_keys(8);
    for order in ORDERS {
        let tree = build(order, &keys);
        group.bench_with_input(BenchmarkId::from_parameter(order), &tree, |b, tree| {
            b.iter(|| {
                for probe in &probes {
                    black_box(tree.search(probe));
                }
            });
        });
    }

    group.finish();
}

fn bench_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree/range");

    let keys = shuffled_keys(11);
    for order in ORDERS {
        let tree = build(order, &keys);
        group.bench_with_input(BenchmarkId::new("middle_half", order), &tree, |b, tree| {
            b.iter(|| black_box(tree.search_range(&(KEY_COUNT / 4), &(KEY_COUNT * 3 / 4))));
        });
        group.bench_with_input(BenchmarkId::new("full_scan", order), &tree, |b, tree| {
            b.iter(|| black_box(tree.iter().count()));
        });
    }

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("btree/remove");
    group.throughput(Throughput::Elements(KEY_COUNT));

    let keys = shuffled_keys(3);
    let victims = shuffled_keys(4);
    for order in ORDERS {
        group.bench_with_input(BenchmarkId::from_parameter(order), &order, |b, &order| {
            b.iter_batched(
                || build(order, &keys),
                |mut tree| {
                    for key in &victims {
                        tree.remove(key).expect("remove");
                    }
                    black_box(tree.is_empty())
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_range, bench_remove);
criterion_main!(benches);
