//! Benchmark for the partitioning heuristics
//!
//! Runs every algorithm over uniform and clustered inputs of growing size and
//! prints timing next to the quality metrics. `nearby` is cubic and only runs
//! on the smaller inputs.

use gridpart::{Algorithm, BoundingBox, InstanceGenerator, InstanceGrid, Partitioner};
use std::time::Instant;

fn bench_algorithms(grid: &InstanceGrid, limit: u32, label: &str) {
    println!("{label}: {} instances, {} cells, limit {limit}", grid.len(), grid.cell_count());
    let mut partitioner = Partitioner::new(grid, limit);

    for algorithm in Algorithm::ALL {
        if algorithm == Algorithm::Nearby && grid.len() > 5_000 {
            println!("  {:<10} skipped", algorithm.as_str());
            continue;
        }
        let start = Instant::now();
        if let Err(err) = partitioner.run(algorithm) {
            println!("  {:<10} failed: {err}", algorithm.as_str());
            continue;
        }
        let elapsed = start.elapsed();
        let summary = partitioner.summary().expect("a run just finished");
        println!(
            "  {:<10} {:>9.2}ms  partitions {:>6}  violating {:>4}  routing {:>12.1}",
            algorithm.as_str(),
            elapsed.as_secs_f64() * 1000.0,
            summary.partitions,
            summary.violating,
            summary.total_routing_length
        );
    }
    println!();
}

fn main() {
    println!("gridpart partitioning benchmark");
    println!("===============================\n");

    let seed = 95756739_u64;
    let area = BoundingBox::from_coords(0.0, 0.0, 1000.0, 1000.0);

    for count in [1_000, 10_000, 50_000] {
        let mut grid = InstanceGrid::with_capacity(10.0, count).expect("valid bin size");
        grid.extend(InstanceGenerator::new(seed).uniform(count, &area).expect("valid area"));
        bench_algorithms(&grid, 64, "uniform");

        let mut grid = InstanceGrid::with_capacity(10.0, count).expect("valid bin size");
        grid.extend(
            InstanceGenerator::new(seed)
                .gaussian_clusters(count, 12, 40.0, &area)
                .expect("valid area"),
        );
        bench_algorithms(&grid, 64, "clustered");
    }
}

/*
cargo bench --bench partition_bench
*/
