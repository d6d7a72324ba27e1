use std::hint::black_box;
use std::time::Instant;

use navgrid_common::{Coordinate, DEFAULT_CELL_SIZE};
use navgrid_grid::Grid;
use navgrid_paths::{LockPolicy, PathFinder, PriorityQueue};

/// Square lattice with 4-neighbour connections on the z = 0 plane.
fn make_lattice(side: i32) -> Grid {
    let mut grid = Grid::new("bench", DEFAULT_CELL_SIZE);
    for x in 0..side {
        for y in 0..side {
            let c = Coordinate::new(x, y, 0);
            grid.add_node(c, c.to_world(DEFAULT_CELL_SIZE));
        }
    }
    for x in 0..side {
        for y in 0..side {
            let c = Coordinate::new(x, y, 0);
            for next in [c.offset(1, 0, 0), c.offset(0, 1, 0)].into_iter().flatten() {
                grid.connect_to(c, next);
            }
        }
    }
    grid
}

fn bench_corner_to_corner(side: i32, iterations: usize) {
    let grid = make_lattice(side);
    let start_c = Coordinate::ORIGIN;
    let goal_c = Coordinate::new(side - 1, side - 1, 0);

    let start = Instant::now();
    for _ in 0..iterations {
        let finder = PathFinder::new(black_box(&grid), start_c, goal_c).unwrap();
        let _ = black_box(finder.find());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  corner to corner ({side}x{side} lattice, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_walled(side: i32, iterations: usize) {
    let mut grid = make_lattice(side);
    // Lock a wall down the middle column, leaving a gap on the last row.
    for y in 0..side - 1 {
        grid.lock_node(Coordinate::new(side / 2, y, 0));
    }
    let start_c = Coordinate::ORIGIN;
    let goal_c = Coordinate::new(side - 1, 0, 0);

    let start = Instant::now();
    for _ in 0..iterations {
        let finder = PathFinder::new(black_box(&grid), start_c, goal_c)
            .unwrap()
            .with_lock_policy(LockPolicy::Avoid);
        let _ = black_box(finder.find());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  walled detour ({side}x{side} lattice, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_queue(count: u32, iterations: usize) {
    let start = Instant::now();
    for _ in 0..iterations {
        let mut q = PriorityQueue::new();
        for i in 0..count {
            q.enqueue(i, ((i * 7919) % count) as f32);
        }
        while let Some(k) = q.dequeue() {
            black_box(k);
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  queue fill+drain ({count} keys, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Pathfinding Benchmarks ===\n");

    println!("Open lattice:");
    bench_corner_to_corner(16, 1000);
    bench_corner_to_corner(64, 100);
    bench_corner_to_corner(128, 10);

    println!("\nLocked wall:");
    bench_walled(32, 100);
    bench_walled(96, 10);

    println!("\nPriority queue:");
    bench_queue(1_000, 1000);
    bench_queue(100_000, 10);

    println!("\n=== Done ===");
}
