//! Capacity-bounded cluster of instances.

use std::collections::BTreeMap;

use crate::geom::{BoundingBox, Point2D};
use crate::instance::Instance;

/// A mutable accumulator: a set of instances unique by name, their weight sum
/// and the weight-weighted centroid of their locations.
///
/// Partitions own copies of their members, so they outlive the grid they were
/// built from.
///
/// The centroid is updated incrementally on [`add`](Self::add) and recomputed
/// exactly on [`remove`](Self::remove). Zero-weight members do not pull the
/// centroid unless every member weighs zero, in which case it is the plain
/// mean of their locations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partition {
    members: BTreeMap<String, Instance>,
    total_bitsize: u64,
    centroid: Point2D,
}

impl Partition {
    /// Creates an empty partition with its centroid at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty partition whose centroid starts at `anchor`.
    ///
    /// The anchor only matters until the first member arrives.
    pub fn anchored_at(anchor: Point2D) -> Self {
        Self {
            centroid: anchor,
            ..Self::default()
        }
    }

    /// Adds an instance; returns `false` if an instance with the same name is
    /// already a member (the partition is left untouched).
    pub fn add(&mut self, instance: Instance) -> bool {
        if self.members.contains_key(instance.name()) {
            return false;
        }

        let prev_count = self.members.len();
        let prev_weight = self.total_bitsize as f64;
        let weight = f64::from(instance.bitsize());
        let loc = instance.location();

        self.total_bitsize += u64::from(instance.bitsize());
        let _ = self.members.insert(instance.name().to_owned(), instance);

        if prev_count == 0 {
            self.centroid = loc;
        } else if self.total_bitsize == 0 {
            let n = (prev_count + 1) as f64;
            self.centroid = Point2D::new(
                (self.centroid.x * (n - 1.0) + loc.x) / n,
                (self.centroid.y * (n - 1.0) + loc.y) / n,
            );
        } else {
            let sum = prev_weight + weight;
            self.centroid = Point2D::new(
                (self.centroid.x * prev_weight + loc.x * weight) / sum,
                (self.centroid.y * prev_weight + loc.y * weight) / sum,
            );
        }
        true
    }

    /// Removes the member equal to `instance`; returns whether anything was removed.
    ///
    /// The centroid is recomputed from the remaining members and reset to the
    /// origin once the partition is empty.
    pub fn remove(&mut self, instance: &Instance) -> bool {
        match self.members.get(instance.name()) {
            Some(member) if member == instance => {}
            _ => return false,
        }
        let _ = self.members.remove(instance.name());
        self.total_bitsize -= u64::from(instance.bitsize());
        self.centroid = self.exact_centroid();
        true
    }

    /// Weighted mean of member locations computed from scratch
    pub fn exact_centroid(&self) -> Point2D {
        if self.members.is_empty() {
            return Point2D::origin();
        }
        let (mut sx, mut sy, mut sw) = (0.0, 0.0, 0.0);
        for inst in self.members.values() {
            let w = f64::from(inst.bitsize());
            sx += inst.x() * w;
            sy += inst.y() * w;
            sw += w;
        }
        if sw > 0.0 {
            return Point2D::new(sx / sw, sy / sw);
        }
        let n = self.members.len() as f64;
        let (sx, sy) = self
            .members
            .values()
            .fold((0.0, 0.0), |(ax, ay), inst| (ax + inst.x(), ay + inst.y()));
        Point2D::new(sx / n, sy / n)
    }

    /// Sum over members of the Manhattan distance to their nearest other member.
    ///
    /// Lower is better. 0 for partitions with fewer than two members. O(n^2).
    pub fn total_routing_distance(&self) -> f64 {
        let members: Vec<&Instance> = self.members.values().collect();
        if members.len() < 2 {
            return 0.0;
        }
        members
            .iter()
            .enumerate()
            .map(|(i, a)| {
                members
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(_, b)| a.distance_to(b))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    /// Whether a member with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Members ordered by name
    pub fn instances(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.members.values()
    }

    /// Sum of member bitsizes
    pub fn total_bitsize(&self) -> u64 {
        self.total_bitsize
    }

    /// Maintained weighted centroid
    pub fn centroid(&self) -> Point2D {
        self.centroid
    }

    /// Tight box around the members, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut members = self.members.values();
        let mut bbox = BoundingBox::from_point(members.next()?.location());
        for inst in members {
            bbox.expand_to(inst.location());
        }
        Some(bbox)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns whether the partition has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
