//! Performance benchmarks for ECOGRID

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ecogrid::stats::process_statistics;
use ecogrid::{Config, World};

fn scaled_config(grid_size: usize) -> Config {
    let mut config = Config::default();
    config.world.grid_size = grid_size;
    config.run.stop_at_zero = false;

    let scale = (grid_size * grid_size) as f64 / 400.0;
    for entry in &mut config.animals {
        entry.initial_count = (entry.initial_count as f64 * scale).round() as usize;
    }
    for entry in &mut config.foods {
        entry.initial_count = (entry.initial_count as f64 * scale).round() as usize;
    }
    config
}

fn benchmark_world_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_epoch");

    for grid_size in [20, 40, 80].iter() {
        let mut world = World::new_with_seed(scaled_config(*grid_size), 42).unwrap();

        // Warm up
        world.run(5).unwrap();

        group.bench_with_input(
            BenchmarkId::new("grid_size", grid_size),
            grid_size,
            |b, &size| {
                b.iter(|| {
                    // Populations can die out; start over when they do
                    if world.is_extinct() {
                        world = World::new_with_seed(scaled_config(size), 42).unwrap();
                    }
                    world.epoch().unwrap();
                });
            },
        );
    }

    group.finish();
}

fn benchmark_statistics(c: &mut Criterion) {
    let world = World::new_with_seed(scaled_config(80), 42).unwrap();
    let samples: Vec<(usize, [f64; 8])> = world
        .animals()
        .map(|a| (world.config.species_index(a.species).unwrap_or(0), a.trait_vector()))
        .collect();

    c.bench_function("process_statistics", |b| {
        b.iter(|| process_statistics(black_box(&samples), 2));
    });
}

fn benchmark_checkpoint(c: &mut Criterion) {
    let mut world = World::new_with_seed(scaled_config(40), 42).unwrap();
    world.run(20).unwrap();

    let checkpoint = world.create_checkpoint();

    c.bench_function("checkpoint_serialize", |b| {
        b.iter(|| bincode::serialize(black_box(&checkpoint)).unwrap());
    });

    let serialized = bincode::serialize(&checkpoint).unwrap();

    c.bench_function("checkpoint_deserialize", |b| {
        b.iter(|| {
            let _: ecogrid::checkpoint::Checkpoint =
                bincode::deserialize(black_box(&serialized)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    benchmark_world_epoch,
    benchmark_statistics,
    benchmark_checkpoint,
);

criterion_main!(benches);
