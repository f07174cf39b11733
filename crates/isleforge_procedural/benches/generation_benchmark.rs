//! Benchmark for full world generation and grouping.
//!
//! TARGET: batch export of 1,000 default-size levels in under a second
//!
//! Run with: cargo bench --package isleforge_procedural --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use isleforge_procedural::grouping::group;
use isleforge_procedural::{seeded_rng, GenerationConfig, RoomPartitioner, TerrainSynthesizer};

fn benchmark_dungeon(c: &mut Criterion) {
    let config = GenerationConfig::default();
    let partitioner = RoomPartitioner::new(&config.dungeon);

    c.bench_function("dungeon_120x80", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut rng = seeded_rng(seed);
            black_box(partitioner.generate(config.width, config.height, &mut rng))
        });
    });
}

fn benchmark_island(c: &mut Criterion) {
    let config = GenerationConfig::default();
    let synth = TerrainSynthesizer::new(&config.island);

    let mut group = c.benchmark_group("island");
    group.throughput(Throughput::Elements((config.width * config.height) as u64));
    group.sample_size(20);

    group.bench_function("island_120x80", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut rng = seeded_rng(seed);
            black_box(synth.generate(config.width, config.height, &mut rng))
        });
    });

    group.finish();
}

fn benchmark_grouping(c: &mut Criterion) {
    let config = GenerationConfig::default();
    let island = TerrainSynthesizer::new(&config.island).generate(
        config.width,
        config.height,
        &mut seeded_rng(42),
    );

    c.bench_function("group_island_120x80", |b| {
        b.iter(|| black_box(group(black_box(&island.grid))));
    });
}

criterion_group!(benches, benchmark_dungeon, benchmark_island, benchmark_grouping);
criterion_main!(benches);
