//! Capacity-bounded partitioning of a populated [`InstanceGrid`].
//!
//! Four heuristics are available, see [`Algorithm`]. Each one reads the grid,
//! discards any previous result and stores a fresh list of partitions that
//! the metric methods then inspect.

mod hashmap;
mod localized;
mod merging;
mod metrics;
mod nearby;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PartitionError;
use crate::grid::InstanceGrid;
use crate::partition::Partition;

pub use merging::{BalanceOutcome, BalanceReport};
pub use metrics::PartitionSummary;

/// Partitioning heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Algorithm {
    /// Naive bin-fill over the grid cells in ascending cell order (baseline)
    #[serde(alias = "naive")]
    Hashmap,
    /// Row sweep with a leftover pass
    Localized,
    /// Nearest-neighbour growth from seeds
    Nearby,
    /// Tiling followed by the balancing pass
    Merging,
}

impl Algorithm {
    /// Every algorithm, baseline first
    pub const ALL: [Self; 4] = [Self::Hashmap, Self::Localized, Self::Nearby, Self::Merging];

    /// Lowercase name used in configs and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hashmap => "hashmap",
            Self::Localized => "localized",
            Self::Nearby => "nearby",
            Self::Merging => "merging",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown algorithm {0:?} (expected hashmap, naive, localized, nearby or merging)")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hashmap" | "naive" => Ok(Self::Hashmap),
            "localized" => Ok(Self::Localized),
            "nearby" => Ok(Self::Nearby),
            "merging" => Ok(Self::Merging),
            _ => Err(UnknownAlgorithm(s.to_owned())),
        }
    }
}

/// Result of the most recent run.
#[derive(Clone, Debug)]
struct Outcome {
    algorithm: Algorithm,
    partitions: Vec<Partition>,
    balance: Option<BalanceReport>,
}

/// Groups the instances of a borrowed grid into partitions whose total
/// bitsize should not exceed `bitsize_limit`.
///
/// Reading partitions or metrics before any algorithm ran fails with
/// [`PartitionError::NotComputed`]; nothing is computed implicitly.
///
/// # Examples
/// ```
/// use gridpart::{Instance, InstanceGrid, Partitioner};
///
/// let mut grid = InstanceGrid::new(10.0).unwrap();
/// grid.extend([
///     Instance::new("a", 1.0, 1.0, 5),
///     Instance::new("b", 2.0, 2.0, 5),
///     Instance::new("c", 50.0, 50.0, 5),
///     Instance::new("d", 51.0, 51.0, 5),
/// ]);
///
/// let mut partitioner = Partitioner::new(&grid, 15);
/// let parts = partitioner.partition_merging().unwrap();
/// assert_eq!(parts.len(), 2);
/// assert_eq!(partitioner.missed_instance_count().unwrap(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Partitioner<'g> {
    grid: &'g InstanceGrid,
    bitsize_limit: u32,
    max_balance_iterations: Option<usize>,
    outcome: Option<Outcome>,
}

impl<'g> Partitioner<'g> {
    /// Creates a partitioner over `grid` with the given capacity limit
    pub fn new(grid: &'g InstanceGrid, bitsize_limit: u32) -> Self {
        Self {
            grid,
            bitsize_limit,
            max_balance_iterations: None,
            outcome: None,
        }
    }

    /// Caps the number of balancing iterations run by [`Self::partition_merging`].
    ///
    /// Defaults to the number of instances plus one; each instance moves at
    /// most once so the default is never the limiting factor.
    #[must_use]
    pub fn with_max_balance_iterations(mut self, max: usize) -> Self {
        self.max_balance_iterations = Some(max);
        self
    }

    /// The borrowed grid
    pub fn grid(&self) -> &'g InstanceGrid {
        self.grid
    }

    /// Capacity limit
    pub fn bitsize_limit(&self) -> u32 {
        self.bitsize_limit
    }

    /// Runs the selected algorithm
    ///
    /// # Errors
    /// See the individual algorithms.
    pub fn run(&mut self, algorithm: Algorithm) -> Result<&[Partition], PartitionError> {
        match algorithm {
            Algorithm::Hashmap => self.partition_hashmap(),
            Algorithm::Localized => self.partition_localized(),
            Algorithm::Nearby => self.partition_nearby(),
            Algorithm::Merging => self.partition_merging(),
        }
    }

    /// Baseline partitioning; same as [`Self::partition_hashmap`]
    ///
    /// # Errors
    /// Never fails; the `Result` keeps the signature uniform with the other algorithms.
    pub fn partition(&mut self) -> Result<&[Partition], PartitionError> {
        self.partition_hashmap()
    }

    /// Partitions from the most recent run
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn partitions(&self) -> Result<&[Partition], PartitionError> {
        Ok(&self.outcome()?.partitions)
    }

    /// Algorithm of the most recent run, if any
    pub fn last_algorithm(&self) -> Option<Algorithm> {
        self.outcome.as_ref().map(|o| o.algorithm)
    }

    /// Balancing report of the most recent run; `None` unless it was [`Algorithm::Merging`]
    pub fn last_balance(&self) -> Option<&BalanceReport> {
        self.outcome.as_ref().and_then(|o| o.balance.as_ref())
    }

    /// Drops the stored result
    pub fn clear(&mut self) {
        self.outcome = None;
    }

    fn outcome(&self) -> Result<&Outcome, PartitionError> {
        self.outcome.as_ref().ok_or(PartitionError::NotComputed)
    }

    /// Stores a finished run and hands its partitions back
    fn finish(
        &mut self,
        algorithm: Algorithm,
        partitions: Vec<Partition>,
        balance: Option<BalanceReport>,
    ) -> Result<&[Partition], PartitionError> {
        info!(
            %algorithm,
            partitions = partitions.len(),
            instances = self.grid.len(),
            limit = self.bitsize_limit,
            "partitioning finished"
        );
        let outcome = self.outcome.insert(Outcome {
            algorithm,
            partitions,
            balance,
        });
        Ok(&outcome.partitions)
    }

    /// Fill threshold `limit - max_bitsize` for the algorithms that size bins
    /// from it; fails when there is no headroom.
    fn headroom(&mut self, algorithm: Algorithm) -> Result<u32, PartitionError> {
        let max_bitsize = self.grid.max_bitsize();
        if self.bitsize_limit <= max_bitsize {
            self.outcome = None;
            tracing::warn!(
                %algorithm,
                limit = self.bitsize_limit,
                max_bitsize,
                "capacity limit leaves no headroom"
            );
            return Err(PartitionError::InfeasibleCapacity {
                limit: self.bitsize_limit,
                max_bitsize,
            });
        }
        Ok(self.bitsize_limit - max_bitsize)
    }

    /// Estimated number of bins: `ceil(total / (limit - max_bitsize))`, at least 1
    fn target_bin_count(&self, headroom: u32) -> usize {
        let bins = self.grid.total_bitsize().div_ceil(u64::from(headroom)).max(1);
        usize::try_from(bins).unwrap_or(usize::MAX)
    }
}

/// Picks the `(nx, ny)` tiling with `nx * ny >= count` whose bins are closest
/// to square for a `width` x `height` area. Ties keep the smaller `nx`.
fn best_tiling(count: usize, width: f64, height: f64) -> (usize, usize) {
    let mut best = (1, count);
    let mut best_diff = f64::MAX;
    for nx in 1..=count {
        let ny = count.div_ceil(nx);
        let diff = (width / nx as f64 - height / ny as f64).abs();
        if diff < best_diff {
            best_diff = diff;
            best = (nx, ny);
        }
    }
    debug!(count, nx = best.0, ny = best.1, "selected tiling");
    best
}
