//! Nearest-neighbour growth.

use std::collections::BTreeSet;

use tracing::trace;

use crate::error::PartitionError;
use crate::grid::InstanceId;
use crate::partition::Partition;

use super::{Algorithm, Partitioner};

impl Partitioner<'_> {
    /// Seeds a partition with the lowest-id unassigned instance and grows it
    /// one instance at a time: the next member is the unassigned instance
    /// nearest (Manhattan) to the most recently added one among those that
    /// still fit. The partition closes when nothing fits or nothing is left.
    ///
    /// Produces contiguous partitions at near-cubic cost; meant as an
    /// accuracy-first reference for small and medium inputs. The seed is
    /// always admitted, so an instance heavier than the limit forms its own
    /// (violating) partition instead of stalling the loop.
    ///
    /// # Errors
    /// Never fails.
    pub fn partition_nearby(&mut self) -> Result<&[Partition], PartitionError> {
        let grid = self.grid;
        let limit = u64::from(self.bitsize_limit);
        let mut unassigned: BTreeSet<InstanceId> = grid.ids().collect();
        let mut partitions = Vec::new();

        while let Some(seed) = unassigned.pop_first() {
            let mut current = Partition::new();
            let _ = current.add(grid.get(seed).clone());
            let mut frontier = grid.location_of(seed);

            loop {
                let room = limit.saturating_sub(current.total_bitsize());
                let nearest = unassigned
                    .iter()
                    .copied()
                    .filter(|&id| u64::from(grid.get(id).bitsize()) <= room)
                    .map(|id| (frontier.manhattan_distance(grid.location_of(id)), id))
                    .min_by(|a, b| a.0.total_cmp(&b.0));
                let Some((_, next)) = nearest else {
                    break;
                };
                let _ = unassigned.remove(&next);
                let _ = current.add(grid.get(next).clone());
                frontier = grid.location_of(next);
            }

            trace!(members = current.len(), bitsize = current.total_bitsize(), "closed nearby partition");
            partitions.push(current);
        }

        self.finish(Algorithm::Nearby, partitions, None)
    }
}
