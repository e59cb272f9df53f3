//! Criterion micro-benchmarks for the diffusion sampler.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_behavior::ShapeContext;
use stratum_blocks::{reference_registry, COPPER_BLOCK};
use stratum_core::{random_stream, BlockPos, SectionPos, TickId, WorldGrid};
use stratum_engine::{DiffusionConfig, DiffusionSampler, MemoryGrid};
use stratum_test_utils::cube;

/// Benchmark: scan a copper cell buried in a solid 16³ copper cube.
fn bench_scan_dense(c: &mut Criterion) {
    let registry = reference_registry();
    let copper = registry.by_name(COPPER_BLOCK).unwrap().default_state();
    let mut grid = MemoryGrid::new(cube(16), &registry, 0);
    grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(15, 15, 15), &copper);
    let sampler = DiffusionSampler::new(&DiffusionConfig::default());
    let ctx = ShapeContext::new(&grid, &registry);
    let pos = BlockPos::new(8, 8, 8);

    c.bench_function("diffusion_scan_dense", |b| {
        b.iter(|| black_box(sampler.scan(&ctx, pos, &copper, "oxidation")));
    });
}

/// Benchmark: 4096 gated evaluations, roughly one section's worth.
fn bench_evaluate_4096(c: &mut Criterion) {
    let registry = reference_registry();
    let copper = registry.by_name(COPPER_BLOCK).unwrap().default_state();
    let mut grid = MemoryGrid::new(cube(16), &registry, 0);
    grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(15, 15, 15), &copper);
    let sampler = DiffusionSampler::new(&DiffusionConfig::default());
    let ctx = ShapeContext::new(&grid, &registry);

    c.bench_function("diffusion_evaluate_4096", |b| {
        b.iter(|| {
            let mut rng = random_stream(1, TickId(1), SectionPos::new(0, 0, 0));
            for i in 0..4096i32 {
                let pos = BlockPos::new(i % 16, (i / 16) % 16, i / 256);
                black_box(sampler.evaluate(&ctx, pos, &copper, &mut rng));
            }
        });
    });
}

criterion_group!(benches, bench_scan_dense, bench_evaluate_4096);
criterion_main!(benches);
