//! Seeded random instance sets for experiments, demos and benches.

use std::collections::HashSet;

use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::GeneratorError;
use crate::geom::{BoundingBox, Point2D};
use crate::instance::Instance;

const DEFAULT_NAME_LENGTH: usize = 8;
const DEFAULT_MAX_BITSIZE: u32 = 8;

/// Generates instances with random alphanumeric names, unique within one
/// generator, and weights uniform in `0..=max_bitsize`.
///
/// # Examples
/// ```
/// use gridpart::{BoundingBox, InstanceGenerator};
///
/// let mut generator = InstanceGenerator::new(7);
/// let area = BoundingBox::from_coords(0.0, 0.0, 100.0, 200.0);
/// let instances = generator.uniform(1_000, &area).unwrap();
/// assert_eq!(instances.len(), 1_000);
/// assert!(instances.iter().all(|i| area.contains(i.location())));
/// ```
#[derive(Debug)]
pub struct InstanceGenerator {
    rng: StdRng,
    name_length: usize,
    max_bitsize: u32,
    used_names: HashSet<String>,
}

impl InstanceGenerator {
    /// Creates a generator with a fixed seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            name_length: DEFAULT_NAME_LENGTH,
            max_bitsize: DEFAULT_MAX_BITSIZE,
            used_names: HashSet::new(),
        }
    }

    /// Sets the length of generated names (at least 1)
    #[must_use]
    pub fn with_name_length(mut self, len: usize) -> Self {
        self.name_length = len.max(1);
        self
    }

    /// Sets the largest generated bitsize
    #[must_use]
    pub fn with_max_bitsize(mut self, max: u32) -> Self {
        self.max_bitsize = max;
        self
    }

    /// `count` instances uniformly spread over `area`
    ///
    /// # Errors
    /// [`GeneratorError::InvalidBounds`] for an inverted or non-finite box.
    pub fn uniform(&mut self, count: usize, area: &BoundingBox) -> Result<Vec<Instance>, GeneratorError> {
        check_area(area)?;
        Ok((0..count)
            .map(|_| {
                let x = self.rng.random_range(area.ll.x..=area.ur.x);
                let y = self.rng.random_range(area.ll.y..=area.ur.y);
                self.instance_at(Point2D::new(x, y))
            })
            .collect())
    }

    /// `count` instances around `clusters` centres drawn uniformly in `area`;
    /// offsets follow a normal distribution with standard deviation `sigma`
    /// and points are clamped to `area`.
    ///
    /// # Errors
    /// [`GeneratorError::InvalidBounds`], [`GeneratorError::InvalidSigma`] or
    /// [`GeneratorError::NoClusters`].
    pub fn gaussian_clusters(
        &mut self,
        count: usize,
        clusters: usize,
        sigma: f64,
        area: &BoundingBox,
    ) -> Result<Vec<Instance>, GeneratorError> {
        check_area(area)?;
        if clusters == 0 {
            return Err(GeneratorError::NoClusters);
        }
        let spread = Normal::new(0.0, sigma).map_err(|_| GeneratorError::InvalidSigma(sigma))?;

        let centres: Vec<Point2D> = (0..clusters)
            .map(|_| {
                Point2D::new(
                    self.rng.random_range(area.ll.x..=area.ur.x),
                    self.rng.random_range(area.ll.y..=area.ur.y),
                )
            })
            .collect();

        Ok((0..count)
            .map(|i| {
                let centre = centres[i % clusters];
                let x = (centre.x + spread.sample(&mut self.rng)).clamp(area.ll.x, area.ur.x);
                let y = (centre.y + spread.sample(&mut self.rng)).clamp(area.ll.y, area.ur.y);
                self.instance_at(Point2D::new(x, y))
            })
            .collect())
    }

    fn instance_at(&mut self, location: Point2D) -> Instance {
        let bitsize = self.rng.random_range(0..=self.max_bitsize);
        let name = self.unique_name();
        Instance::at(name, location, bitsize)
    }

    fn unique_name(&mut self) -> String {
        let name: String = (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(self.name_length)
            .map(char::from)
            .collect();
        // Alphanumeric never yields '_', so the suffixed form cannot collide
        let name = if self.used_names.contains(&name) {
            format!("{name}_{}", self.used_names.len())
        } else {
            name
        };
        let _ = self.used_names.insert(name.clone());
        name
    }
}

fn check_area(area: &BoundingBox) -> Result<(), GeneratorError> {
    let finite = [area.ll.x, area.ll.y, area.ur.x, area.ur.y]
        .iter()
        .all(|v| v.is_finite());
    if !finite || area.ll.x > area.ur.x || area.ll.y > area.ur.y {
        return Err(GeneratorError::InvalidBounds);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> BoundingBox {
        BoundingBox::from_coords(0.0, 0.0, 100.0, 200.0)
    }

    #[test]
    fn test_same_seed_same_instances() {
        let a = InstanceGenerator::new(42).uniform(200, &area()).unwrap();
        let b = InstanceGenerator::new(42).uniform(200, &area()).unwrap();
        assert_eq!(a, b, "Generation must be reproducible for a fixed seed");
    }

    #[test]
    fn test_names_are_unique() {
        let instances = InstanceGenerator::new(1)
            .with_name_length(1)
            .uniform(500, &area())
            .unwrap();
        let names: HashSet<&str> = instances.iter().map(Instance::name).collect();
        assert_eq!(names.len(), instances.len(), "Short names must still be unique");
    }

    #[test]
    fn test_bitsize_range() {
        let instances = InstanceGenerator::new(3)
            .with_max_bitsize(4)
            .uniform(300, &area())
            .unwrap();
        assert!(instances.iter().all(|i| i.bitsize() <= 4));
    }

    #[test]
    fn test_gaussian_clusters_stay_in_area() {
        let instances = InstanceGenerator::new(9)
            .gaussian_clusters(400, 5, 30.0, &area())
            .unwrap();
        assert_eq!(instances.len(), 400);
        assert!(instances.iter().all(|i| area().contains(i.location())));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut generator = InstanceGenerator::new(0);
        let inverted = BoundingBox::from_coords(10.0, 0.0, 0.0, 5.0);
        assert_eq!(generator.uniform(1, &inverted), Err(GeneratorError::InvalidBounds));
        assert_eq!(
            generator.gaussian_clusters(1, 0, 1.0, &area()),
            Err(GeneratorError::NoClusters)
        );
        assert!(matches!(
            generator.gaussian_clusters(1, 2, -1.0, &area()),
            Err(GeneratorError::InvalidSigma(_))
        ));
    }
}
