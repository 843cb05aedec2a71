use super::{Axis, Coord};

/// Closed wrap interval `[low, high]` of one axis.
///
/// Values beyond either end alias back into the interval; `high - low` is
/// the wrap period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    /// Creates a new interval.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Wrap period of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.high - self.low).abs()
    }

    /// Midpoint of the interval, the meridian farthest from the wrap line.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    /// Reduces `value` into the interval, keeping `high` itself unchanged.
    #[must_use]
    pub fn wrap(&self, value: f64) -> f64 {
        wrap_num(value, *self, true)
    }
}

/// Wrap intervals of a coordinate space, per axis.
///
/// An axis without an interval never wraps and is never checked for
/// crossings.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WrapBounds {
    pub axis1: Option<Interval>,
    pub axis2: Option<Interval>,
}

impl WrapBounds {
    /// World-map bounds: axis 2 wraps over `[-180, 180]`, axis 1 does not wrap.
    #[must_use]
    pub fn world() -> Self {
        Self {
            axis1: None,
            axis2: Some(Interval::new(-180.0, 180.0)),
        }
    }

    /// Interval of `axis`, if it wraps.
    #[must_use]
    pub fn get(&self, axis: Axis) -> Option<Interval> {
        match axis {
            Axis::First => self.axis1,
            Axis::Second => self.axis2,
        }
    }

    /// Reduces every wrapping component of `c` into its interval.
    #[must_use]
    pub fn wrap(&self, c: Coord) -> Coord {
        let mut out = c;
        for axis in Axis::BOTH {
            if let Some(iv) = self.get(axis) {
                out[axis.index()] = iv.wrap(c[axis.index()]);
            }
        }
        out
    }
}

/// Reduces `value` into `[range.low, range.high)` by modular wrap.
///
/// With `include_max`, a value exactly equal to `range.high` is returned
/// as-is instead of aliasing to `range.low`.
#[must_use]
pub fn wrap_num(value: f64, range: Interval, include_max: bool) -> f64 {
    if include_max && value == range.high {
        return value;
    }
    let period = range.high - range.low;
    if period == 0.0 {
        return range.low;
    }
    (value - range.low).rem_euclid(period) + range.low
}
