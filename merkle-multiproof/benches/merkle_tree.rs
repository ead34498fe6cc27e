use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use merkle_multiproof::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn merkle_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_tree");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    let mut rng = StdRng::seed_from_u64(0);
    for exponent in [10, 16] {
        let num_leaves = 1 << exponent;
        let leaves: Vec<Digest> = (0..num_leaves).map(|_| rng.random()).collect();

        group.bench_function(BenchmarkId::new("new", num_leaves), |bencher| {
            bencher.iter(|| MerkleTree::<Keccak256>::new(&leaves))
        });
        group.bench_function(BenchmarkId::new("new_sorted", num_leaves), |bencher| {
            bencher.iter(|| MerkleTree::<Keccak256>::new_sorted(&leaves))
        });
    }
}

criterion_group!(benches, merkle_tree);
criterion_main!(benches);
