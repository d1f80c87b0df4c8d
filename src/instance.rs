//! Named, located, weighted items.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseInstanceError;
use crate::geom::Point2D;

/// An immutable record: unique name, 2D location and a non-negative weight
/// (its "bitsize").
///
/// Equality compares all three fields. Hashing uses the name only, so two
/// instances with the same name land in the same bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Instance {
    name: String,
    location: Point2D,
    bitsize: u32,
}

impl Instance {
    /// Creates an instance
    pub fn new(name: impl Into<String>, x: f64, y: f64, bitsize: u32) -> Self {
        Self::at(name, Point2D::new(x, y), bitsize)
    }

    /// Creates an instance at an existing point
    pub fn at(name: impl Into<String>, location: Point2D, bitsize: u32) -> Self {
        Self {
            name: name.into(),
            location,
            bitsize,
        }
    }

    /// Unique name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X coordinate
    pub fn x(&self) -> f64 {
        self.location.x
    }

    /// Y coordinate
    pub fn y(&self) -> f64 {
        self.location.y
    }

    /// Location
    pub fn location(&self) -> Point2D {
        self.location
    }

    /// Weight contributed to whatever partition holds this instance
    pub fn bitsize(&self) -> u32 {
        self.bitsize
    }

    /// Manhattan distance to another instance
    #[inline]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.location.manhattan_distance(other.location)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.location == other.location && self.bitsize == other.bitsize
    }
}

// Coordinates are finite for every instance built from records or generators.
impl Eq for Instance {}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Instance {
    /// Record form: `name x y bitsize`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.name, self.location.x, self.location.y, self.bitsize)
    }
}

impl FromStr for Instance {
    type Err = ParseInstanceError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let name = fields.next().ok_or(ParseInstanceError::MissingField("name"))?;
        let x = parse_coord(fields.next(), "x")?;
        let y = parse_coord(fields.next(), "y")?;
        let raw = fields.next().ok_or(ParseInstanceError::MissingField("bitsize"))?;
        let bitsize = raw.parse::<u32>().map_err(|_| ParseInstanceError::InvalidNumber {
            field: "bitsize",
            value: raw.to_owned(),
        })?;
        if let Some(extra) = fields.next() {
            return Err(ParseInstanceError::TrailingField(extra.to_owned()));
        }
        Ok(Self::new(name, x, y, bitsize))
    }
}

fn parse_coord(raw: Option<&str>, field: &'static str) -> Result<f64, ParseInstanceError> {
    let raw = raw.ok_or(ParseInstanceError::MissingField(field))?;
    let value = raw.parse::<f64>().map_err(|_| ParseInstanceError::InvalidNumber {
        field,
        value: raw.to_owned(),
    })?;
    if !value.is_finite() {
        return Err(ParseInstanceError::NonFinite(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_distance_is_manhattan() {
        let a = Instance::new("a", 1.0, 2.0, 3);
        let b = Instance::new("b", -2.0, 6.0, 1);
        assert_eq!(a.distance_to(&b), 7.0);
        assert_eq!(b.distance_to(&a), 7.0, "Distance should be symmetric");
    }

    #[test]
    fn test_equality_compares_all_fields() {
        let a = Instance::new("a", 1.0, 2.0, 3);
        assert_eq!(a, Instance::new("a", 1.0, 2.0, 3));
        assert_ne!(a, Instance::new("a", 1.0, 2.0, 4), "Bitsize differs");
        assert_ne!(a, Instance::new("a", 1.5, 2.0, 3), "Location differs");
        assert_ne!(a, Instance::new("b", 1.0, 2.0, 3), "Name differs");
    }

    #[test]
    fn test_distinct_names_never_collide_in_sets() {
        let mut set = HashSet::new();
        assert!(set.insert(Instance::new("a", 0.0, 0.0, 1)));
        assert!(set.insert(Instance::new("b", 0.0, 0.0, 1)), "Same location, different name");
        assert!(!set.insert(Instance::new("a", 0.0, 0.0, 1)), "Identical instance is a duplicate");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_record() {
        let inst: Instance = "cell_42  10.5 -3 7".parse().unwrap();
        assert_eq!(inst.name(), "cell_42");
        assert_eq!(inst.location(), Point2D::new(10.5, -3.0));
        assert_eq!(inst.bitsize(), 7);
    }

    #[test]
    fn test_parse_record_errors() {
        assert_eq!(
            "only_name".parse::<Instance>(),
            Err(ParseInstanceError::MissingField("x"))
        );
        assert_eq!(
            "n 1 2".parse::<Instance>(),
            Err(ParseInstanceError::MissingField("bitsize"))
        );
        assert!(matches!(
            "n 1 2 -4".parse::<Instance>(),
            Err(ParseInstanceError::InvalidNumber { field: "bitsize", .. })
        ));
        assert_eq!("n inf 2 4".parse::<Instance>(), Err(ParseInstanceError::NonFinite("x")));
        assert!(matches!(
            "n 1 2 4 extra".parse::<Instance>(),
            Err(ParseInstanceError::TrailingField(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let inst = Instance::new("abc", 0.25, 100.0, 8);
        let parsed: Instance = inst.to_string().parse().unwrap();
        assert_eq!(parsed, inst);
    }
}
