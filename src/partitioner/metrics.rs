//! Quality metrics over the most recent partitioning.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::PartitionError;
use crate::instance::Instance;

use super::{Algorithm, BalanceReport, Partitioner};

/// Every metric of one run, ready to print or serialize.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartitionSummary {
    /// Algorithm that produced the partitions
    pub algorithm: Algorithm,
    /// Capacity limit used
    pub bitsize_limit: u32,
    /// Number of partitions
    pub partitions: usize,
    /// Number of instances in the grid
    pub instances: usize,
    /// Grid instances found in no partition
    pub missed: usize,
    /// Extra copies of instances held by more than one partition
    pub duplicates: usize,
    /// Mean partition bitsize
    pub average_bitsize: f64,
    /// Smallest partition bitsize (0 when there are no partitions)
    pub min_bitsize: u64,
    /// Largest partition bitsize (0 when there are no partitions)
    pub max_bitsize: u64,
    /// Partitions above the limit
    pub violating: usize,
    /// Sum of per-partition routing distances
    pub total_routing_length: f64,
    /// Balancing report, merging only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceReport>,
}

impl Partitioner<'_> {
    /// Number of grid instances that appear in no partition; 0 for a correct partitioning
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn missed_instance_count(&self) -> Result<usize, PartitionError> {
        let placed: HashSet<&Instance> = self
            .partitions()?
            .iter()
            .flat_map(|p| p.instances())
            .collect();
        Ok(self
            .grid
            .instances()
            .iter()
            .filter(|inst| !placed.contains(inst))
            .count())
    }

    /// Number of member slots beyond the first for instances held by several partitions
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn duplicate_instance_count(&self) -> Result<usize, PartitionError> {
        let partitions = self.partitions()?;
        let total: usize = partitions.iter().map(|p| p.len()).sum();
        let unique: HashSet<&str> = partitions
            .iter()
            .flat_map(|p| p.instances())
            .map(Instance::name)
            .collect();
        Ok(total - unique.len())
    }

    /// Mean partition bitsize (0 when there are no partitions)
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn average_bitsize(&self) -> Result<f64, PartitionError> {
        let partitions = self.partitions()?;
        if partitions.is_empty() {
            return Ok(0.0);
        }
        let sum: u64 = partitions.iter().map(|p| p.total_bitsize()).sum();
        Ok(sum as f64 / partitions.len() as f64)
    }

    /// Number of partitions whose bitsize exceeds the limit
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn violating_limit_count(&self) -> Result<usize, PartitionError> {
        let limit = u64::from(self.bitsize_limit);
        Ok(self
            .partitions()?
            .iter()
            .filter(|p| p.total_bitsize() > limit)
            .count())
    }

    /// Sum of every partition's nearest-neighbour routing distance; lower is better
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn total_routing_length(&self) -> Result<f64, PartitionError> {
        Ok(self
            .partitions()?
            .iter()
            .map(|p| p.total_routing_distance())
            .sum())
    }

    /// Collects every metric of the most recent run
    ///
    /// # Errors
    /// [`PartitionError::NotComputed`] if no algorithm ran yet.
    pub fn summary(&self) -> Result<PartitionSummary, PartitionError> {
        let outcome = self.outcome()?;
        let weights = outcome.partitions.iter().map(|p| p.total_bitsize());
        Ok(PartitionSummary {
            algorithm: outcome.algorithm,
            bitsize_limit: self.bitsize_limit,
            partitions: outcome.partitions.len(),
            instances: self.grid.len(),
            missed: self.missed_instance_count()?,
            duplicates: self.duplicate_instance_count()?,
            average_bitsize: self.average_bitsize()?,
            min_bitsize: weights.clone().min().unwrap_or(0),
            max_bitsize: weights.max().unwrap_or(0),
            violating: self.violating_limit_count()?,
            total_routing_length: self.total_routing_length()?,
            balance: outcome.balance,
        })
    }
}
