use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evolarium_core::config::AppConfig;
use evolarium_core::world::grid::ObstacleGrid;
use evolarium_core::world::World;
use evolarium_core::Simulation;
use evolarium_data::{Obstacle, ObstacleKind, Provenance, Rect, Vec2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn obstacle_field() -> Vec<Obstacle> {
    (0..400)
        .map(|i| {
            let x = (i % 20) as f64 * 60.0;
            let y = (i / 20) as f64 * 40.0;
            Obstacle::new(
                i,
                ObstacleKind::Wall,
                Rect::new(x, y, 20.0, 20.0),
                Provenance::Generated,
            )
        })
        .collect()
}

fn bench_grid_build(c: &mut Criterion) {
    let obstacles = obstacle_field();

    c.bench_function("grid_build_400", |b| {
        b.iter(|| {
            let mut grid = ObstacleGrid::new(40.0, 1200.0, 800.0);
            grid.build(black_box(&obstacles));
            black_box(grid)
        })
    });
}

fn bench_grid_query(c: &mut Criterion) {
    let obstacles = obstacle_field();
    let mut grid = ObstacleGrid::new(40.0, 1200.0, 800.0);
    grid.build(&obstacles);
    let mut hits = Vec::new();

    c.bench_function("grid_query_400", |b| {
        b.iter(|| {
            grid.query_into(black_box(&Rect::new(500.0, 300.0, 120.0, 120.0)), &mut hits);
            black_box(hits.len())
        })
    });
}

fn bench_collides_blocking(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let world = World::generate(&config, &mut rng);

    c.bench_function("world_collides_blocking", |b| {
        b.iter(|| {
            let hit = world.collides_blocking(black_box(Vec2::new(600.0, 400.0)), 8.0);
            black_box(hit)
        })
    });
}

fn bench_spawn_position(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let world = World::generate(&config, &mut rng);

    c.bench_function("world_spawn_position", |b| {
        b.iter(|| {
            let placement = world.spawn_position(&mut rng);
            black_box(placement)
        })
    });
}

fn bench_world_generate(c: &mut Criterion) {
    let config = AppConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("world_generate", |b| {
        b.iter(|| {
            let world = World::generate(&config, &mut rng);
            black_box(world)
        })
    });
}

fn bench_simulation_step(c: &mut Criterion) {
    let mut config = AppConfig::default();
    config.world.seed = Some(42);
    config.time.adaptive = false;
    config.time.max_ticks = u64::MAX;

    c.bench_function("simulation_step_30_agents", |b| {
        b.iter_batched(
            || Simulation::new(config.clone()).expect("valid config"),
            |mut sim| {
                for _ in 0..10 {
                    black_box(sim.step().ok());
                }
                sim
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_grid_build,
    bench_grid_query,
    bench_collides_blocking,
    bench_spawn_position,
    bench_world_generate,
    bench_simulation_step
);
criterion_main!(benches);
