//! Run every partitioning algorithm over the same clustered input and compare.
use gridpart::{Algorithm, BoundingBox, InstanceGenerator, InstanceGrid, Partitioner};

fn main() {
    let area = BoundingBox::from_coords(0.0, 0.0, 400.0, 200.0);
    let instances = InstanceGenerator::new(7)
        .gaussian_clusters(1_500, 8, 15.0, &area)
        .expect("valid parameters");

    let mut grid = InstanceGrid::new(8.0).expect("positive bin size");
    grid.extend(instances);

    let mut partitioner = Partitioner::new(&grid, 48);
    println!("{:<10} {:>10} {:>9} {:>9} {:>12}", "algorithm", "partitions", "avg bits", "violating", "routing");
    for algorithm in Algorithm::ALL {
        let _ = partitioner.run(algorithm).expect("limit exceeds every bitsize");
        let s = partitioner.summary().expect("a run just finished");
        assert_eq!(s.missed, 0, "{algorithm} left instances out");
        println!(
            "{:<10} {:>10} {:>9.2} {:>9} {:>12.1}",
            algorithm.as_str(),
            s.partitions,
            s.average_bitsize,
            s.violating,
            s.total_routing_length
        );
    }
}
