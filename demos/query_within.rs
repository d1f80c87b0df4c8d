//! Find instances inside a query rectangle.
use gridpart::prelude::*;

fn main() {
    let mut grid = InstanceGrid::new(1.0).expect("positive bin size");
    let a = grid.insert(Instance::new("a", 0.5, 0.5, 3)); // inside
    let b = grid.insert(Instance::new("b", 2.5, 2.5, 3)); // outside
    let c = grid.insert(Instance::new("c", 1.3, 0.7, 3)); // on the query edge

    let mut results = Vec::new();
    grid.query_within(&BoundingBox::from_coords(0.2, 0.2, 1.3, 1.3), &mut results);
    println!("Within: {results:?}");

    // The query box is closed, so an instance on its edge is included
    assert_eq!(results.len(), 2, "Expected 2 instances");
    assert!(results.contains(&a), "a should be found");
    assert!(results.contains(&c), "c should be found");
    assert!(!results.contains(&b), "b should not be found");

    for inst in grid.cell_instances(0.9, 0.1) {
        println!("cell {:?} holds {inst}", grid.cell_key(inst.x(), inst.y()));
    }
}
