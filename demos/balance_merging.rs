//! Watch the balancing pass move instances out of an overloaded tile.
use gridpart::prelude::*;

fn main() {
    let mut grid = InstanceGrid::new(10.0).expect("positive bin size");
    // Twenty heavy instances crowd one corner, one light instance stretches the box
    for i in 0..20 {
        let x = f64::from(i % 5);
        let y = f64::from(i / 5);
        let _ = grid.insert(Instance::new(format!("h{i}"), x, y, 5));
    }
    let _ = grid.insert(Instance::new("far", 100.0, 100.0, 1));

    for cap in [Some(3), None] {
        let mut partitioner = Partitioner::new(&grid, 30);
        if let Some(max) = cap {
            partitioner = partitioner.with_max_balance_iterations(max);
        }
        let parts = partitioner.partition_merging().expect("limit exceeds every bitsize");
        let weights: Vec<u64> = parts.iter().map(Partition::total_bitsize).collect();
        let report = partitioner.last_balance().expect("merging reports balancing");
        println!("iteration cap {cap:?}: weights {weights:?}, {report:?}");
    }
}
