//! Tiling followed by iterative load balancing.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PartitionError;
use crate::geom::{BoundingBox, Point2D};
use crate::partition::Partition;

use super::{Algorithm, Partitioner, best_tiling};

/// How the balancing pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
#[non_exhaustive]
pub enum BalanceOutcome {
    /// No partition exceeds the limit
    Balanced,
    /// Overflowing partitions remain and no further move fits
    Stalled {
        /// Partitions still over the limit
        overflowing: usize,
    },
}

/// Summary of one balancing pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// Outer iterations run (each performs at most one move)
    pub iterations: usize,
    /// Instances moved
    pub moves: usize,
    /// Final state
    pub outcome: BalanceOutcome,
}

impl BalanceReport {
    /// Whether every partition ended within the limit
    pub fn is_balanced(&self) -> bool {
        self.outcome == BalanceOutcome::Balanced
    }
}

impl Partitioner<'_> {
    /// Carves the bounding box into the near-square `nx` x `ny` tiling sized
    /// by `ceil(total / (limit - max_bitsize))`, collects each rectangle's
    /// instances into one partition, then rebalances.
    ///
    /// Rectangles are emitted in column-major order even when empty, and
    /// every partition starts anchored at its rectangle's center. An instance
    /// on a shared rectangle edge joins the first rectangle that reaches it.
    ///
    /// Balancing: partitions above the limit are *overflowing*, those below
    /// `limit - max_bitsize` are *underflowing*. Each outer iteration looks at
    /// the overflowing partitions in order, picks the underflowing partition
    /// with the nearest centroid and moves the member closest to that centroid
    /// that still fits it. At most one move happens per iteration. The pass
    /// ends when either class is empty or no move fits; the latter is reported
    /// as [`BalanceOutcome::Stalled`].
    ///
    /// # Errors
    /// [`PartitionError::InfeasibleCapacity`] when the limit does not exceed
    /// the heaviest instance (an empty grid always succeeds).
    pub fn partition_merging(&mut self) -> Result<&[Partition], PartitionError> {
        let Some(bounds) = self.grid.bounds() else {
            let report = BalanceReport {
                iterations: 0,
                moves: 0,
                outcome: BalanceOutcome::Balanced,
            };
            return self.finish(Algorithm::Merging, Vec::new(), Some(report));
        };
        let headroom = self.headroom(Algorithm::Merging)?;
        let grid = self.grid;

        let count = self.target_bin_count(headroom);
        let (nx, ny) = best_tiling(count, bounds.width(), bounds.height());
        let bin_w = bounds.width() / nx as f64;
        let bin_h = bounds.height() / ny as f64;
        let edge = |origin: f64, step: f64, i: usize, n: usize, end: f64| {
            if i == n { end } else { origin + i as f64 * step }
        };

        let mut partitions = Vec::with_capacity(nx * ny);
        let mut assigned = vec![false; grid.len()];
        let mut found = Vec::new();

        for ix in 0..nx {
            let left = edge(bounds.ll.x, bin_w, ix, nx, bounds.ur.x);
            let right = edge(bounds.ll.x, bin_w, ix + 1, nx, bounds.ur.x);
            for iy in 0..ny {
                let bottom = edge(bounds.ll.y, bin_h, iy, ny, bounds.ur.y);
                let top = edge(bounds.ll.y, bin_h, iy + 1, ny, bounds.ur.y);
                let rect = BoundingBox::new(Point2D::new(left, bottom), Point2D::new(right, top));

                let mut part = Partition::anchored_at(rect.center());
                found.clear();
                grid.query_within(&rect, &mut found);
                for &id in &found {
                    if !assigned[id.index()] {
                        assigned[id.index()] = true;
                        let _ = part.add(grid.get(id).clone());
                    }
                }
                partitions.push(part);
            }
        }

        // Float rounding can leave a sliver between rectangles; route strays by tile index
        for id in grid.ids() {
            if assigned[id.index()] {
                continue;
            }
            let loc = grid.location_of(id);
            let ix = tile_index(loc.x - bounds.ll.x, bin_w, nx);
            let iy = tile_index(loc.y - bounds.ll.y, bin_h, ny);
            let _ = partitions[ix * ny + iy].add(grid.get(id).clone());
        }

        debug!(nx, ny, partitions = partitions.len(), "tiling done, balancing");
        let max_iterations = self.max_balance_iterations.unwrap_or(grid.len() + 1);
        let report = balance(
            &mut partitions,
            u64::from(self.bitsize_limit),
            u64::from(headroom),
            max_iterations,
        );
        self.finish(Algorithm::Merging, partitions, Some(report))
    }
}

#[expect(clippy::cast_possible_truncation, reason = "clamped to the tile count")]
fn tile_index(offset: f64, step: f64, n: usize) -> usize {
    if step <= 0.0 {
        return 0;
    }
    ((offset / step).floor().max(0.0) as usize).min(n - 1)
}

/// Moves instances from overflowing to underflowing partitions until no
/// overflowing/underflowing pair remains, no move fits, or `max_iterations`
/// outer iterations ran.
pub(crate) fn balance(
    partitions: &mut [Partition],
    limit: u64,
    low: u64,
    max_iterations: usize,
) -> BalanceReport {
    let mut iterations = 0;
    let mut moves = 0;

    while iterations < max_iterations {
        let over: Vec<usize> = (0..partitions.len())
            .filter(|&i| partitions[i].total_bitsize() > limit)
            .collect();
        let under: Vec<usize> = (0..partitions.len())
            .filter(|&i| partitions[i].total_bitsize() < low)
            .collect();
        if over.is_empty() || under.is_empty() {
            break;
        }
        iterations += 1;

        let mut moved = false;
        for &oi in &over {
            let source = partitions[oi].centroid();
            let Some(ui) = under.iter().copied().min_by(|&a, &b| {
                let da = source.euclidean_distance(partitions[a].centroid());
                let db = source.euclidean_distance(partitions[b].centroid());
                da.total_cmp(&db)
            }) else {
                continue;
            };

            let target = partitions[ui].centroid();
            let room = limit.saturating_sub(partitions[ui].total_bitsize());
            let mut ranked: Vec<_> = partitions[oi]
                .instances()
                .map(|inst| (inst.location().euclidean_distance(target), inst))
                .collect();
            ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.name().cmp(b.1.name())));
            let candidate = ranked
                .into_iter()
                .find(|(_, inst)| u64::from(inst.bitsize()) <= room)
                .map(|(_, inst)| inst.clone());

            match candidate {
                Some(inst) => {
                    debug!(from = oi, to = ui, instance = inst.name(), "balancing move");
                    let _ = partitions[oi].remove(&inst);
                    let _ = partitions[ui].add(inst);
                    moves += 1;
                    moved = true;
                    break;
                }
                None => debug!(from = oi, to = ui, "no member fits the nearest underflowing partition"),
            }
        }
        if !moved {
            break;
        }
    }

    let overflowing = partitions.iter().filter(|p| p.total_bitsize() > limit).count();
    let outcome = if overflowing == 0 {
        BalanceOutcome::Balanced
    } else {
        warn!(overflowing, iterations, moves, "balancing stalled with overflowing partitions");
        BalanceOutcome::Stalled { overflowing }
    };
    BalanceReport {
        iterations,
        moves,
        outcome,
    }
}
