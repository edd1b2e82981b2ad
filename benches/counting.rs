//! Counting engine and sampler benchmarks.
//!
//! Run with:
//! ```bash
//! cargo bench --bench counting
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gencpnet::count::{NetCount, Weighting};
use gencpnet::cpnet::CpNet;
use gencpnet::cpt::CptBuilder;
use gencpnet::sampler::DagSampler;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// Benchmark: cold counting (fresh memo tables every iteration)
// ============================================================================

fn bench_count_bounded_ldag(c: &mut Criterion) {
    let mut group = c.benchmark_group("count/bounded_ldag");
    group.sample_size(10);

    for n in [10, 20, 40, 63] {
        group.bench_with_input(BenchmarkId::new("c=5", n), &n, |b, &n| {
            b.iter(|| NetCount::default().count_bounded_ldag(n, 5));
        });
    }

    group.finish();
}

fn bench_count_cpnet(c: &mut Criterion) {
    let mut group = c.benchmark_group("count/cpnet");
    group.sample_size(10);

    for (d, i) in [(2, 0.0), (3, 0.0), (2, 0.25)] {
        group.bench_with_input(
            BenchmarkId::new(format!("d={},i={}", d, i), 20),
            &(d, i),
            |b, &(d, i)| {
                b.iter(|| NetCount::new(d, i).unwrap().count_cpnet(20, 3).unwrap());
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark: sampling with warm memo tables
// ============================================================================

fn bench_sample_dag(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampler/dag");

    let counts = NetCount::default();
    for n in [10, 30, 63] {
        let sampler = DagSampler::new(&counts, n, 5, Weighting::CpNet);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        sampler.sample(&mut rng).unwrap(); // warm up the memo tables
        group.bench_with_input(BenchmarkId::new("c=5", n), &n, |b, _| {
            b.iter(|| sampler.sample(&mut rng).unwrap());
        });
    }

    group.finish();
}

fn bench_generate_cpnet(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator/cpnet");
    group.sample_size(20);

    for d in [2, 3] {
        let counts = NetCount::new(d, 0.0).unwrap();
        let sampler = DagSampler::new(&counts, 20, 3, Weighting::CpNet);
        let builder = CptBuilder::new(d, 0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::new("n=20,c=3", d), &d, |b, _| {
            b.iter(|| CpNet::random(&mut rng, &sampler, &builder).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_count_bounded_ldag,
    bench_count_cpnet,
    bench_sample_dag,
    bench_generate_cpnet,
);

criterion_main!(benches);
