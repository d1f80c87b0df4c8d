//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use gridpart::prelude::*;
//! ```

pub use crate::{
    Algorithm, BoundingBox, Instance, InstanceGrid, InstanceId, Partition, PartitionError, Partitioner,
    Point2D,
};
