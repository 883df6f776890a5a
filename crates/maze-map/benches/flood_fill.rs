//! 代价传播性能基准测试
//!
//! 对比剪枝与穷举两种洪水填充在蛇形迷宫上的耗时。

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use maze_map::{CostPropagator, Direction, Grid, PathBuilder};

/// 蛇形走廊：东西往返 7 趟，每趟之间北移一格
fn serpentine() -> Grid {
    let mut grid = Grid::new();
    grid.shift_west(7).unwrap();
    grid.shift_south(7).unwrap();
    for lap in 0..7 {
        let dir = if lap % 2 == 0 { Direction::East } else { Direction::West };
        grid.advance(dir, 14).unwrap();
        grid.advance(Direction::North, 1).unwrap();
    }
    grid.record_finish(grid.here());
    grid
}

fn bench_propagate(c: &mut Criterion) {
    let grid = serpentine();

    c.bench_function("propagate_pruned", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            black_box(CostPropagator::new().propagate(&mut g).unwrap())
        })
    });

    c.bench_function("propagate_exhaustive", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            black_box(CostPropagator::exhaustive().propagate(&mut g).unwrap())
        })
    });
}

fn bench_build_path(c: &mut Criterion) {
    let mut grid = serpentine();
    CostPropagator::new().propagate(&mut grid).unwrap();

    c.bench_function("build_path", |b| {
        b.iter(|| black_box(PathBuilder::default().build(black_box(&grid)).unwrap()))
    });
}

criterion_group!(benches, bench_propagate, bench_build_path);
criterion_main!(benches);
