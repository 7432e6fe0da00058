use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use numbered_tiles::{Board, BoardConfigBuilder, BoardPreset};
use std::hint::black_box;

const PRESETS: [BoardPreset; 3] = [BoardPreset::Small, BoardPreset::Medium, BoardPreset::Large];

fn benchmark_presets(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for preset in PRESETS {
        let config = BoardConfigBuilder::new()
            .seed("bench")
            .preset(preset)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("preset", preset.name()), &config, |b, config| {
            b.iter(|| Board::generate(black_box(config.clone())).unwrap())
        });
    }
    group.finish();
}

fn benchmark_relaxation(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation");
    group.sample_size(10);

    for iterations in [0, 1, 5] {
        let config = BoardConfigBuilder::new()
            .seed("bench")
            .preset(BoardPreset::Large)
            .relax_iterations(iterations)
            .unwrap()
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::new("large", iterations), &config, |b, config| {
            b.iter(|| Board::generate(black_box(config.clone())).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_presets, benchmark_relaxation);
criterion_main!(benches);
