use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use microsim_plan::{astar, dijkstra, rrt, OccupancyGrid, RrtParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn course() -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(42, 30, 20.0).unwrap();
    grid.mark_rect(Vec2::new(200.0, 0.0), Vec2::new(240.0, 400.0));
    grid.mark_rect(Vec2::new(450.0, 200.0), Vec2::new(500.0, 600.0));
    grid
}

fn bench_planners(c: &mut Criterion) {
    let mut group = c.benchmark_group("planners");
    let grid = course();
    let start = Vec2::new(60.0, 300.0);
    let goal = Vec2::new(790.0, 300.0);

    group.bench_function(BenchmarkId::new("astar", ""), |b| {
        b.iter(|| black_box(astar(&grid, start, goal)))
    });

    group.bench_function(BenchmarkId::new("dijkstra", ""), |b| {
        b.iter(|| black_box(dijkstra(&grid, start, goal)))
    });

    group.bench_function(BenchmarkId::new("rrt", ""), |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(3);
            black_box(rrt(&grid, start, goal, &RrtParams::default(), &mut rng))
        })
    });
}

criterion_group!(benches, bench_planners);
criterion_main!(benches);
