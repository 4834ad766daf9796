//! Spin throughput benchmarks

use cl_engine::{ParameterSet, SpinEngine};
use cl_sim::{SimConfig, Simulator};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_single_spin(c: &mut Criterion) {
    let mut group = c.benchmark_group("spin");

    for wild_prob in [0.0179, 0.08] {
        let engine = SpinEngine::new(ParameterSet::standard().with_wild_prob(wild_prob)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        group.bench_with_input(
            BenchmarkId::new("wild_prob", wild_prob),
            &wild_prob,
            |b, _| b.iter(|| black_box(engine.spin(&mut rng))),
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let sim = Simulator::new(ParameterSet::standard()).unwrap();

    for shards in [1, 4] {
        let config = SimConfig::quick()
            .with_spins(20_000)
            .with_shards(shards)
            .with_seed(7);
        group.throughput(Throughput::Elements(config.spins));
        group.bench_with_input(BenchmarkId::new("shards", shards), &config, |b, config| {
            b.iter(|| black_box(sim.run(config).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_spin, bench_batch);
criterion_main!(benches);
