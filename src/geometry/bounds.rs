use crate::math::{coord, Coord};

use super::Vertices;

/// Axis-aligned coordinate bounds spanned by two corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Corner with the smallest component on both axes.
    pub min: Coord,
    /// Corner with the largest component on both axes.
    pub max: Coord,
}

impl Bounds {
    /// Creates bounds from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            min: coord(a.x.min(b.x), a.y.min(b.y)),
            max: coord(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest bounds containing every coordinate, or `None` for an empty list.
    #[must_use]
    pub fn from_coords(coords: &[Coord]) -> Option<Self> {
        let (first, rest) = coords.split_first()?;
        Some(rest.iter().fold(Self::new(*first, *first), |b, c| b.extend(*c)))
    }

    /// Grows the bounds to contain `c`.
    #[must_use]
    pub fn extend(self, c: Coord) -> Self {
        Self {
            min: coord(self.min.x.min(c.x), self.min.y.min(c.y)),
            max: coord(self.max.x.max(c.x), self.max.y.max(c.y)),
        }
    }

    /// Center of the bounds.
    #[must_use]
    pub fn center(&self) -> Coord {
        nalgebra::center(&self.min, &self.max)
    }

    /// The four corners as a polygon ring, starting at the minimum corner.
    #[must_use]
    pub fn ring(&self) -> Vertices {
        Vertices::Flat(vec![
            self.min,
            coord(self.max.x, self.min.y),
            self.max,
            coord(self.min.x, self.max.y),
        ])
    }
}
