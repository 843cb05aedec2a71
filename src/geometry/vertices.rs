use crate::math::{Coord, TOLERANCE};

/// Vertex list of a shape: either a flat ring or nested rings.
///
/// Polylines carry a flat list, polygons with holes and multi-polylines
/// carry one nested level per ring, and multi-polygons nest twice.
#[derive(Debug, Clone, PartialEq)]
pub enum Vertices {
    Flat(Vec<Coord>),
    Nested(Vec<Vertices>),
}

impl Default for Vertices {
    fn default() -> Self {
        Vertices::Flat(Vec::new())
    }
}

impl Vertices {
    /// Whether this is a single flat ring.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        matches!(self, Vertices::Flat(_))
    }

    /// Total number of coordinates across all rings.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Vertices::Flat(coords) => coords.len(),
            Vertices::Nested(rings) => rings.iter().map(Vertices::len).sum(),
        }
    }

    /// Whether there are no coordinates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every coordinate, depth-first in ring order.
    #[must_use]
    pub fn coords(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(self.len());
        self.for_each(&mut |c| out.push(*c));
        out
    }

    /// First coordinate, depth-first.
    #[must_use]
    pub fn first(&self) -> Option<Coord> {
        match self {
            Vertices::Flat(coords) => coords.first().copied(),
            Vertices::Nested(rings) => rings.iter().find_map(Vertices::first),
        }
    }

    /// Visits every coordinate depth-first.
    pub fn for_each(&self, f: &mut impl FnMut(&Coord)) {
        match self {
            Vertices::Flat(coords) => {
                for c in coords {
                    f(c);
                }
            }
            Vertices::Nested(rings) => {
                for ring in rings {
                    ring.for_each(f);
                }
            }
        }
    }

    /// Returns a copy with `f` applied to every coordinate, keeping the nesting.
    #[must_use]
    pub fn map(&self, f: &impl Fn(Coord) -> Coord) -> Vertices {
        match self {
            Vertices::Flat(coords) => Vertices::Flat(coords.iter().map(|c| f(*c)).collect()),
            Vertices::Nested(rings) => Vertices::Nested(rings.iter().map(|r| r.map(f)).collect()),
        }
    }

    /// Appends a coordinate to the last flat ring, creating one if needed.
    pub fn push(&mut self, c: Coord) {
        match self {
            Vertices::Flat(coords) => coords.push(c),
            Vertices::Nested(rings) => match rings.last_mut() {
                Some(ring) => ring.push(c),
                None => rings.push(Vertices::Flat(vec![c])),
            },
        }
    }

    /// Removes a trailing vertex that repeats the ring's first vertex.
    ///
    /// Polygon rings are implicitly closed, so an explicit closing vertex is
    /// redundant.
    #[must_use]
    pub fn without_closing_vertex(&self) -> Vertices {
        match self {
            Vertices::Flat(coords) => {
                let mut coords = coords.clone();
                if coords.len() > 1 {
                    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
                        if (first - last).norm() < TOLERANCE {
                            coords.pop();
                        }
                    }
                }
                Vertices::Flat(coords)
            }
            Vertices::Nested(rings) => {
                Vertices::Nested(rings.iter().map(Vertices::without_closing_vertex).collect())
            }
        }
    }
}

impl From<Vec<Coord>> for Vertices {
    fn from(coords: Vec<Coord>) -> Self {
        Vertices::Flat(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    fn ring() -> Vertices {
        Vertices::Flat(vec![coord(0.0, 0.0), coord(0.0, 10.0), coord(10.0, 10.0)])
    }

    #[test]
    fn len_counts_nested_rings() {
        let v = Vertices::Nested(vec![ring(), ring()]);
        assert_eq!(v.len(), 6);
        assert!(!v.is_flat());
        assert_eq!(v.first(), Some(coord(0.0, 0.0)));
    }

    #[test]
    fn map_keeps_nesting() {
        let v = Vertices::Nested(vec![ring()]);
        let shifted = v.map(&|c| coord(c.x, c.y + 360.0));
        let Vertices::Nested(rings) = shifted else {
            panic!("nesting lost");
        };
        assert_eq!(rings[0].coords()[1], coord(0.0, 370.0));
    }

    #[test]
    fn push_into_last_ring() {
        let mut v = Vertices::Nested(vec![ring(), ring()]);
        v.push(coord(5.0, 5.0));
        let Vertices::Nested(rings) = &v else {
            panic!("nesting lost");
        };
        assert_eq!(rings[0].len(), 3);
        assert_eq!(rings[1].len(), 4);
    }

    #[test]
    fn closing_vertex_dropped() {
        let closed = Vertices::Flat(vec![
            coord(0.0, 0.0),
            coord(0.0, 10.0),
            coord(10.0, 10.0),
            coord(0.0, 0.0),
        ]);
        assert_eq!(closed.without_closing_vertex(), ring());
        assert_eq!(ring().without_closing_vertex(), ring());
    }
}
