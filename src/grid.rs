//! Spatial hash grid over weighted instances.
//!
//! The plane is cut into square cells of side `bin_size`. Every instance is
//! stored once in an owned arena and each cell bucket keeps arena indices, so
//! nothing outside the grid ever holds a pointer into a resizable container.
//! Buckets live in an ordered map: cell enumeration is ascending by
//! `(cx, cy)` and therefore reproducible.

use std::collections::BTreeMap;

use crate::error::GridError;
use crate::geom::{BoundingBox, Point2D};
use crate::instance::Instance;

/// Integer cell coordinate: `(floor(x / bin_size), floor(y / bin_size))`
pub type CellKey = (i64, i64);

/// Stable handle to an instance stored in an [`InstanceGrid`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Arena position
    pub fn index(self) -> usize {
        self.0
    }
}

/// Spatial hash grid for fast locality queries.
///
/// Besides the buckets the grid keeps running aggregates that the partitioning
/// algorithms size their bins from: the bounding box of everything inserted,
/// the heaviest single instance, the instance count and the weight sum.
///
/// # Examples
/// ```
/// use gridpart::{BoundingBox, Instance, InstanceGrid};
///
/// let mut grid = InstanceGrid::new(10.0).unwrap();
/// let _ = grid.insert(Instance::new("a", 1.0, 1.0, 5));
/// let _ = grid.insert(Instance::new("b", 55.0, 52.0, 3));
///
/// let found = grid.instances_within(&BoundingBox::from_coords(0.0, 0.0, 20.0, 20.0));
/// assert_eq!(found.len(), 1);
/// assert_eq!(grid.total_bitsize(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct InstanceGrid {
    /// Side of a square cell
    bin_size: f64,
    /// Instance arena, in insertion order
    instances: Vec<Instance>,
    /// Cell -> arena indices of the members located in that cell
    cells: BTreeMap<CellKey, Vec<InstanceId>>,
    /// Bounding box of all items (inverted while empty)
    bounds: BoundingBox,
    /// Largest bitsize ever inserted
    max_bitsize: u32,
    /// Sum of all bitsizes
    total_bitsize: u64,
}

impl InstanceGrid {
    /// Creates an empty grid with square cells of side `bin_size`
    ///
    /// # Errors
    /// Returns [`GridError::InvalidBinSize`] if `bin_size` is not finite and positive.
    pub fn new(bin_size: f64) -> Result<Self, GridError> {
        Self::with_capacity(bin_size, 0)
    }

    /// Creates an empty grid with room for `capacity` instances
    ///
    /// # Errors
    /// Returns [`GridError::InvalidBinSize`] if `bin_size` is not finite and positive.
    pub fn with_capacity(bin_size: f64, capacity: usize) -> Result<Self, GridError> {
        if !bin_size.is_finite() || bin_size <= 0.0 {
            return Err(GridError::InvalidBinSize(bin_size));
        }
        Ok(Self {
            bin_size,
            instances: Vec::with_capacity(capacity),
            cells: BTreeMap::new(),
            bounds: BoundingBox::from_coords(
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY,
                f64::NEG_INFINITY,
            ),
            max_bitsize: 0,
            total_bitsize: 0,
        })
    }

    /// Adds an instance and updates the aggregates
    pub fn insert(&mut self, instance: Instance) -> InstanceId {
        let id = InstanceId(self.instances.len());
        let location = instance.location();

        self.bounds.expand_to(location);
        self.max_bitsize = self.max_bitsize.max(instance.bitsize());
        self.total_bitsize += u64::from(instance.bitsize());

        self.cells
            .entry(self.cell_key(location.x, location.y))
            .or_default()
            .push(id);
        self.instances.push(instance);
        id
    }

    /// Cell containing `(x, y)`
    #[inline]
    pub fn cell_key(&self, x: f64, y: f64) -> CellKey {
        (cell_coord(x, self.bin_size), cell_coord(y, self.bin_size))
    }

    /// Members of the cell that contains `(x, y)`; empty if the cell was never populated
    pub fn cell_instances(&self, x: f64, y: f64) -> impl Iterator<Item = &Instance> + '_ {
        self.cells
            .get(&self.cell_key(x, y))
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&id| &self.instances[id.0])
    }

    /// Appends the ids of every instance located inside the closed box `bbox`.
    ///
    /// Results are appended to the output vector (not cleared first). Cells
    /// are visited column by column (`cx` outer, `cy` inner); members keep
    /// their insertion order within a cell.
    pub fn query_within(&self, bbox: &BoundingBox, results: &mut Vec<InstanceId>) {
        if self.instances.is_empty() || bbox.ll.x > bbox.ur.x || bbox.ll.y > bbox.ur.y {
            return;
        }

        // Clamp to the populated extent so huge query boxes stay cheap
        let (lo_cx, lo_cy) = self.cell_key(self.bounds.ll.x, self.bounds.ll.y);
        let (hi_cx, hi_cy) = self.cell_key(self.bounds.ur.x, self.bounds.ur.y);
        let (min_cx, min_cy) = self.cell_key(bbox.ll.x, bbox.ll.y);
        let (max_cx, max_cy) = self.cell_key(bbox.ur.x, bbox.ur.y);
        let (min_cx, max_cx) = (min_cx.max(lo_cx), max_cx.min(hi_cx));
        let (min_cy, max_cy) = (min_cy.max(lo_cy), max_cy.min(hi_cy));
        if min_cx > max_cx || min_cy > max_cy {
            return;
        }

        for cx in min_cx..=max_cx {
            // BTreeMap ranges keep the scan bounded by populated cells only
            for (_, bucket) in self.cells.range((cx, min_cy)..=(cx, max_cy)) {
                for &id in bucket {
                    if bbox.contains(self.instances[id.0].location()) {
                        results.push(id);
                    }
                }
            }
        }
    }

    /// Every instance located inside the closed box `bbox`
    pub fn instances_within(&self, bbox: &BoundingBox) -> Vec<&Instance> {
        let mut ids = Vec::new();
        self.query_within(bbox, &mut ids);
        ids.into_iter().map(|id| &self.instances[id.0]).collect()
    }

    /// Looks up an instance by id
    pub fn instance(&self, id: InstanceId) -> Option<&Instance> {
        self.instances.get(id.0)
    }

    /// All instances in insertion order
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Ids of all instances in insertion order
    pub fn ids(&self) -> impl Iterator<Item = InstanceId> + use<> {
        (0..self.instances.len()).map(InstanceId)
    }

    /// Populated cells in ascending `(cx, cy)` order
    pub fn cells(&self) -> impl Iterator<Item = (CellKey, &[InstanceId])> + '_ {
        self.cells.iter().map(|(&key, bucket)| (key, bucket.as_slice()))
    }

    /// Side of a cell
    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    /// Bounding box of all inserted instances, `None` while empty
    pub fn bounds(&self) -> Option<BoundingBox> {
        (!self.instances.is_empty()).then_some(self.bounds)
    }

    /// Largest bitsize ever inserted (0 while empty)
    pub fn max_bitsize(&self) -> u32 {
        self.max_bitsize
    }

    /// Sum of all bitsizes
    pub fn total_bitsize(&self) -> u64 {
        self.total_bitsize
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the number of instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Location of an instance known to be in the arena
    #[inline]
    pub(crate) fn location_of(&self, id: InstanceId) -> Point2D {
        self.instances[id.0].location()
    }

    #[inline]
    pub(crate) fn get(&self, id: InstanceId) -> &Instance {
        &self.instances[id.0]
    }
}

impl Extend<Instance> for InstanceGrid {
    fn extend<T: IntoIterator<Item = Instance>>(&mut self, iter: T) {
        for instance in iter {
            let _ = self.insert(instance);
        }
    }
}

#[expect(clippy::cast_possible_truncation, reason = "cell coordinates of finite input fit in i64")]
#[inline]
fn cell_coord(v: f64, bin_size: f64) -> i64 {
    (v / bin_size).floor() as i64
}
