use std::collections::BTreeSet;
use std::ops::Bound;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{prelude::StdRng, Rng, SeedableRng};
use vebset::{SparseVebSet, UniverseSet, VebSet};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const KEY_CNT: usize = 100_000;
const DENSE_BITS: u32 = 20;
const SPARSE_BITS: u32 = 40;

fn distinct_keys(bits: u32, cnt: usize) -> Vec<usize> {
    let mut r = StdRng::seed_from_u64(123);
    let mut seen = std::collections::HashSet::with_capacity(cnt);
    let mut keys = Vec::with_capacity(cnt);
    let mask = if bits >= usize::BITS {
        usize::MAX
    } else {
        (1 << bits) - 1
    };
    while keys.len() < cnt {
        let k = r.gen::<usize>() & mask;
        if seen.insert(k) {
            keys.push(k);
        }
    }
    keys
}

fn filled<S: UniverseSet>(mut set: S, keys: &[usize]) -> S {
    for k in keys {
        set.insert(*k);
    }
    set
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(criterion::Throughput::Elements(KEY_CNT as u64));

    let dense_keys = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_keys = distinct_keys(SPARSE_BITS, KEY_CNT);

    // construction (the dense preallocation in particular) happens in the
    // batch setup so only the inserts are timed
    group.bench_function(BenchmarkId::new("veb_dense", DENSE_BITS), |b| {
        b.iter_batched(
            || VebSet::new(DENSE_BITS),
            |set| filled(set, &dense_keys).len(),
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function(BenchmarkId::new("veb_sparse", SPARSE_BITS), |b| {
        b.iter_batched(
            || SparseVebSet::new(SPARSE_BITS),
            |set| filled(set, &sparse_keys).len(),
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function(BenchmarkId::new("btree", SPARSE_BITS), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for k in sparse_keys.iter() {
                set.insert(*k);
            }
            set.len()
        })
    });
    group.finish();
}

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("contains");
    group.throughput(criterion::Throughput::Elements(KEY_CNT as u64));

    let dense_keys = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_keys = distinct_keys(SPARSE_BITS, KEY_CNT);
    let dense = filled(VebSet::new(DENSE_BITS), &dense_keys);
    let sparse = filled(SparseVebSet::new(SPARSE_BITS), &sparse_keys);
    let btree: BTreeSet<usize> = sparse_keys.iter().copied().collect();
    // misses probe the same universe with fresh random keys
    let dense_misses = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_misses = distinct_keys(SPARSE_BITS, KEY_CNT);

    group.bench_function(BenchmarkId::new("veb_dense/hit", DENSE_BITS), |b| {
        b.iter(|| dense_keys.iter().filter(|k| dense.contains(**k)).count())
    });
    group.bench_function(BenchmarkId::new("veb_dense/miss", DENSE_BITS), |b| {
        b.iter(|| dense_misses.iter().filter(|k| dense.contains(**k)).count())
    });
    group.bench_function(BenchmarkId::new("veb_sparse/hit", SPARSE_BITS), |b| {
        b.iter(|| sparse_keys.iter().filter(|k| sparse.contains(**k)).count())
    });
    group.bench_function(BenchmarkId::new("veb_sparse/miss", SPARSE_BITS), |b| {
        b.iter(|| sparse_misses.iter().filter(|k| sparse.contains(**k)).count())
    });
    group.bench_function(BenchmarkId::new("btree/hit", SPARSE_BITS), |b| {
        b.iter(|| sparse_keys.iter().filter(|k| btree.contains(*k)).count())
    });
    group.finish();
}

fn bench_successor(c: &mut Criterion) {
    let mut group = c.benchmark_group("successor");
    group.throughput(criterion::Throughput::Elements(KEY_CNT as u64));

    let dense_keys = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_keys = distinct_keys(SPARSE_BITS, KEY_CNT);
    let dense = filled(VebSet::new(DENSE_BITS), &dense_keys);
    let sparse = filled(SparseVebSet::new(SPARSE_BITS), &sparse_keys);
    let btree: BTreeSet<usize> = sparse_keys.iter().copied().collect();
    let dense_probes = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_probes = distinct_keys(SPARSE_BITS, KEY_CNT);

    group.bench_function(BenchmarkId::new("veb_dense", DENSE_BITS), |b| {
        b.iter(|| {
            dense_probes
                .iter()
                .filter_map(|k| dense.successor(*k))
                .fold(0usize, |acc, k| acc.wrapping_add(k))
        })
    });
    group.bench_function(BenchmarkId::new("veb_sparse", SPARSE_BITS), |b| {
        b.iter(|| {
            sparse_probes
                .iter()
                .filter_map(|k| sparse.successor(*k))
                .fold(0usize, |acc, k| acc.wrapping_add(k))
        })
    });
    group.bench_function(BenchmarkId::new("btree", SPARSE_BITS), |b| {
        b.iter(|| {
            sparse_probes
                .iter()
                .filter_map(|k| {
                    btree
                        .range((Bound::Excluded(*k), Bound::Unbounded))
                        .next()
                        .copied()
                })
                .fold(0usize, |acc, k| acc.wrapping_add(k))
        })
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    group.throughput(criterion::Throughput::Elements(KEY_CNT as u64));

    let dense_keys = distinct_keys(DENSE_BITS, KEY_CNT);
    let sparse_keys = distinct_keys(SPARSE_BITS, KEY_CNT);

    group.bench_function(BenchmarkId::new("veb_dense", DENSE_BITS), |b| {
        b.iter_batched(
            || filled(VebSet::new(DENSE_BITS), &dense_keys),
            |mut set| {
                for k in dense_keys.iter() {
                    black_box(set.remove(*k));
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function(BenchmarkId::new("veb_sparse", SPARSE_BITS), |b| {
        b.iter_batched(
            || filled(SparseVebSet::new(SPARSE_BITS), &sparse_keys),
            |mut set| {
                for k in sparse_keys.iter() {
                    black_box(set.remove(*k));
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function(BenchmarkId::new("btree", SPARSE_BITS), |b| {
        b.iter_batched(
            || sparse_keys.iter().copied().collect::<BTreeSet<usize>>(),
            |mut set| {
                for k in sparse_keys.iter() {
                    black_box(set.remove(k));
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_contains,
    bench_successor,
    bench_remove
);
criterion_main!(benches);
