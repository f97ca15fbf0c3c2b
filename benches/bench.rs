use avl_sequence::AvlTree;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::hint::black_box;

const SIZES: [usize; 2] = [100, 10_000];

fn rng() -> StdRng { StdRng::seed_from_u64(0x5EED_AB1E) }

fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for &n in &SIZES {
        group.bench_with_input(BenchmarkId::new("rand", n), &n, |b, &n| {
            let mut rng = rng();
            let mut tree = AvlTree::new();
            for _ in 0..n { let i = rng.gen_range(0..n); tree.insert(i, i); }

            b.iter(|| {
                let k = rng.gen_range(0..n);
                tree.insert(k, k);
            });
        });

        group.bench_with_input(BenchmarkId::new("seq", n), &n, |b, &n| {
            let mut tree = AvlTree::new();
            for i in 0..n { tree.insert(i * 2, i * 2); }

            let mut i = 1;
            b.iter(|| {
                tree.insert(i, i);
                tree.remove(&i);
                i = (i + 2) % (2 * n);
            });
        });
    }

    group.finish();
}

fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");

    for &n in &SIZES {
        group.bench_with_input(BenchmarkId::new("rand", n), &n, |b, &n| {
            let mut rng = rng();
            let mut keys: Vec<_> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let tree: AvlTree<_, _> = keys.iter().map(|&k| (k, k)).collect();
            keys.shuffle(&mut rng);

            let mut i = 0;
            b.iter(|| {
                black_box(tree.get(&keys[i]));
                i = (i + 1) % n;
            });
        });

        group.bench_with_input(BenchmarkId::new("cursor", n), &n, |b, &n| {
            let tree: AvlTree<_, _> = (0..n).map(|k| (k, k)).collect();

            let mut i = 0;
            b.iter(|| {
                black_box(tree.find(&i).value(&tree).ok());
                i = (i + 1) % n;
            });
        });
    }

    group.finish();
}

fn traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");

    for &n in &[100usize, 1000, 100_000] {
        let mut rng = rng();
        let tree: AvlTree<u32, u32> = (0..n).map(|_| (rng.gen(), rng.gen())).collect();

        group.bench_with_input(BenchmarkId::new("iter", n), &tree, |b, tree| {
            b.iter(|| for entry in tree.iter() { black_box(entry); });
        });

        group.bench_with_input(BenchmarkId::new("cursor", n), &tree, |b, tree| {
            b.iter(|| {
                let mut cursor = tree.front();
                while let Ok(entry) = cursor.entry(tree) {
                    black_box(entry);
                    let _ = cursor.advance(tree);
                }
            });
        });
    }

    group.finish();
}

fn remove_at(c: &mut Criterion) {
    c.bench_function("remove_at/drain_10_000", |b| {
        let tree: AvlTree<_, _> = (0..10_000).map(|k| (k, k)).collect();

        b.iter_batched(|| tree.clone(), |mut tree| {
            let mut cursor = tree.front();
            while let Ok(entry) = tree.remove_at(&mut cursor) { black_box(entry); }
            tree
        }, criterion::BatchSize::LargeInput);
    });
}

criterion_group!(benches, insert, find, traverse, remove_at);
criterion_main!(benches);
