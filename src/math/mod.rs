pub mod interval;

pub use interval::{wrap_num, Interval, WrapBounds};

/// 2D coordinate on the cyclic surface.
///
/// Component 0 is axis 1 (latitude-like), component 1 is axis 2
/// (longitude-like), matching the `(lat, lng)` order used by map hosts.
pub type Coord = nalgebra::Point2<f64>;

/// Global tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// One of the two wrap axes of the coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// First coordinate component (latitude-like).
    First,
    /// Second coordinate component (longitude-like).
    Second,
}

impl Axis {
    /// Both axes, in component order.
    pub const BOTH: [Axis; 2] = [Axis::First, Axis::Second];

    /// Index of this axis inside a [`Coord`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::First => 0,
            Axis::Second => 1,
        }
    }
}

/// Creates a coordinate from its axis-1 and axis-2 components.
#[must_use]
pub fn coord(axis1: f64, axis2: f64) -> Coord {
    Coord::new(axis1, axis2)
}
