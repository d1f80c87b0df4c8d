//! Row sweep with a deferred leftover pass.

use tracing::debug;

use crate::error::PartitionError;
use crate::geom::{BoundingBox, Point2D};
use crate::grid::{InstanceGrid, InstanceId};
use crate::partition::Partition;

use super::{Algorithm, Partitioner, best_tiling};

/// Partition being filled together with the grid ids of its members.
#[derive(Debug, Default)]
struct Accumulator {
    partition: Partition,
    ids: Vec<InstanceId>,
}

impl Accumulator {
    /// Adds `id`, first closing the current partition if it would overflow
    fn push(&mut self, grid: &InstanceGrid, id: InstanceId, limit: u64, out: &mut Vec<Partition>) {
        let inst = grid.get(id);
        if self.partition.total_bitsize() + u64::from(inst.bitsize()) > limit && !self.partition.is_empty() {
            self.close(out);
        }
        let _ = self.partition.add(inst.clone());
        self.ids.push(id);
    }

    fn close(&mut self, out: &mut Vec<Partition>) {
        self.ids.clear();
        out.push(std::mem::take(&mut self.partition));
    }

    fn take_ids(&mut self) -> Vec<InstanceId> {
        self.partition = Partition::new();
        std::mem::take(&mut self.ids)
    }
}

impl Partitioner<'_> {
    /// Sweeps the bounding box row by row. Row height comes from the same
    /// near-square tiling as [`Self::partition_merging`]; inside a row a
    /// window one grid cell wide moves left to right and its instances fill
    /// the current partition until it reaches `limit - max_bitsize`.
    ///
    /// Whatever is still open at the end of a row is deferred. A second,
    /// vertical sweep over the bounding box of the deferred instances places
    /// them. Every instance ends up in exactly one partition.
    ///
    /// # Errors
    /// [`PartitionError::InfeasibleCapacity`] when the limit does not exceed
    /// the heaviest instance (an empty grid always succeeds).
    pub fn partition_localized(&mut self) -> Result<&[Partition], PartitionError> {
        let Some(bounds) = self.grid.bounds() else {
            return self.finish(Algorithm::Localized, Vec::new(), None);
        };
        let headroom = self.headroom(Algorithm::Localized)?;
        let threshold = u64::from(headroom);
        let limit = u64::from(self.bitsize_limit);
        let grid = self.grid;

        let count = self.target_bin_count(headroom);
        let (_, ny) = best_tiling(count, bounds.width(), bounds.height());
        let bin_w = grid.bin_size();
        let bin_h = bounds.height() / ny as f64;
        debug!(count, rows = ny, bin_w, bin_h, "localized sweep");

        let mut partitions = Vec::new();
        let mut visited = vec![false; grid.len()];
        let mut deferred = vec![false; grid.len()];
        let mut deferred_box: Option<BoundingBox> = None;
        let mut acc = Accumulator::default();
        let mut found = Vec::new();

        for iy in 0..ny {
            let bottom = bounds.ll.y + iy as f64 * bin_h;
            let top = if iy + 1 == ny {
                bounds.ur.y
            } else {
                bounds.ll.y + (iy + 1) as f64 * bin_h
            };

            found.clear();
            grid.query_within(
                &BoundingBox::new(Point2D::new(bounds.ll.x, bottom), Point2D::new(bounds.ur.x, top)),
                &mut found,
            );
            sort_by_window(&mut found, |id| grid.location_of(id).x, bounds.ll.x, bin_w);
            for &id in &found {
                if visited[id.index()] {
                    continue;
                }
                visited[id.index()] = true;
                acc.push(grid, id, limit, &mut partitions);
                if acc.partition.total_bitsize() >= threshold {
                    acc.close(&mut partitions);
                }
            }

            for id in acc.take_ids() {
                defer(grid, id, &mut deferred, &mut deferred_box);
            }
        }

        // Rows tile the box edge to edge; anything missed by rounding is deferred too
        for id in grid.ids() {
            if !visited[id.index()] {
                defer(grid, id, &mut deferred, &mut deferred_box);
            }
        }

        if let Some(rem) = deferred_box {
            let deferred_count = deferred.iter().filter(|&&d| d).count();
            debug!(deferred = deferred_count, "leftover sweep");

            found.clear();
            grid.query_within(&rem, &mut found);
            found.retain(|id| deferred[id.index()]);
            sort_by_window(&mut found, |id| grid.location_of(id).y, rem.ll.y, bin_w);
            for &id in &found {
                acc.push(grid, id, limit, &mut partitions);
                if acc.partition.total_bitsize() >= threshold {
                    acc.close(&mut partitions);
                }
            }
            if !acc.partition.is_empty() {
                acc.close(&mut partitions);
            }
        }

        self.finish(Algorithm::Localized, partitions, None)
    }
}

/// Orders `ids` the way a sweep of `step`-wide windows starting at `origin`
/// meets them. An instance on a shared window edge belongs to the first
/// window that reaches it; the sort is stable so query order holds inside a
/// window. Empty windows never show up, so huge extents cost nothing extra.
fn sort_by_window(ids: &mut [InstanceId], coord: impl Fn(InstanceId) -> f64, origin: f64, step: f64) {
    let window = |id| ((coord(id) - origin) / step).ceil().max(1.0);
    ids.sort_by(|&a, &b| window(a).total_cmp(&window(b)));
}

fn defer(grid: &InstanceGrid, id: InstanceId, deferred: &mut [bool], bbox: &mut Option<BoundingBox>) {
    deferred[id.index()] = true;
    let loc = grid.location_of(id);
    match bbox {
        Some(b) => b.expand_to(loc),
        None => *bbox = Some(BoundingBox::from_point(loc)),
    }
}
