//! Naive bin-fill baseline.

use crate::error::PartitionError;
use crate::partition::Partition;

use super::{Algorithm, Partitioner};

impl Partitioner<'_> {
    /// Walks the cells in ascending `(cx, cy)` order and their members in
    /// insertion order, filling one partition at a time. A partition is closed
    /// when the next instance would push it over the limit.
    ///
    /// No spatial locality is attempted beyond what the cell order gives. An
    /// instance heavier than the limit ends up alone in an over-limit
    /// partition, which [`Self::violating_limit_count`] reports.
    ///
    /// # Errors
    /// Never fails.
    pub fn partition_hashmap(&mut self) -> Result<&[Partition], PartitionError> {
        let limit = u64::from(self.bitsize_limit);
        let mut partitions = Vec::new();
        let mut current = Partition::new();

        for (_, bucket) in self.grid.cells() {
            for &id in bucket {
                let inst = self.grid.get(id);
                if current.total_bitsize() + u64::from(inst.bitsize()) > limit && !current.is_empty() {
                    partitions.push(std::mem::take(&mut current));
                }
                let _ = current.add(inst.clone());
            }
        }
        if !current.is_empty() {
            partitions.push(current);
        }

        self.finish(Algorithm::Hashmap, partitions, None)
    }
}
