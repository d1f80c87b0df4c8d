//! # gridpart - spatial hash grid and capacity-bounded partitioning
//!
//! Groups a large set of located, weighted items ("instances") into clusters
//! ("partitions") whose total weight stays under a capacity limit, while
//! keeping each cluster spatially tight.
//!
//! ## Features
//!
//! - **Spatial hash grid**: square cells indexed by `floor(coord / bin_size)`,
//!   O(1) cell lookup and range queries proportional to the cells touched
//! - **Four heuristics**: naive bin-fill baseline, localized row sweep,
//!   nearest-neighbour growth and tiling with load balancing
//! - **Quality metrics**: coverage, balance and a nearest-neighbour routing
//!   length to compare heuristics
//! - **Deterministic**: cells are enumerated in ascending order, so reruns on
//!   the same grid give the same partitions
//!
//! ## Quick Start
//!
//! ```rust
//! use gridpart::prelude::*;
//!
//! // Index some instances in a grid with 10x10 cells
//! let mut grid = InstanceGrid::new(10.0).unwrap();
//! grid.extend([
//!     Instance::new("a", 1.0, 1.0, 5),
//!     Instance::new("b", 2.0, 2.0, 5),
//!     Instance::new("c", 50.0, 50.0, 5),
//!     Instance::new("d", 51.0, 51.0, 5),
//! ]);
//!
//! // Range query over a closed box
//! let near_origin = grid.instances_within(&BoundingBox::from_coords(0.0, 0.0, 5.0, 5.0));
//! assert_eq!(near_origin.len(), 2);
//!
//! // Partition with a capacity of 15 per partition
//! let mut partitioner = Partitioner::new(&grid, 15);
//! let parts = partitioner.run(Algorithm::Merging).unwrap();
//! assert_eq!(parts.len(), 2);
//! assert!(parts.iter().all(|p| p.total_bitsize() == 10));
//!
//! let summary = partitioner.summary().unwrap();
//! assert_eq!(summary.missed, 0);
//! assert_eq!(summary.violating, 0);
//! ```
//!
//! ## How It Works
//!
//! The grid owns every instance in a flat arena and maps each populated cell
//! to arena indices. The partitioner borrows the grid, never mutates it, and
//! produces partitions that own copies of their members. Algorithms that size
//! bins from the data estimate `ceil(total / (limit - max_bitsize))` bins and
//! tile the bounding box as close to square as the count allows.

pub mod config;
pub mod error;
pub mod generator;
pub mod geom;
pub mod grid;
pub mod instance;
pub mod partition;
pub mod partitioner;
pub mod prelude;
pub mod records;

mod integration_test;

pub use config::Config;
pub use error::{ConfigError, Error, GeneratorError, GridError, ParseInstanceError, PartitionError, RecordError};
pub use generator::InstanceGenerator;
pub use geom::{BoundingBox, Point2D};
pub use grid::{CellKey, InstanceGrid, InstanceId};
pub use instance::Instance;
pub use partition::Partition;
pub use partitioner::{Algorithm, BalanceOutcome, BalanceReport, PartitionSummary, Partitioner, UnknownAlgorithm};
