use crate::geometry::Vertices;
use crate::math::{Axis, Coord, Interval, WrapBounds};

/// Which axes a shape's extent straddles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisCrossing {
    pub axis1: bool,
    pub axis2: bool,
}

impl AxisCrossing {
    /// Whether `axis` is crossed.
    #[must_use]
    pub fn on(&self, axis: Axis) -> bool {
        match axis {
            Axis::First => self.axis1,
            Axis::Second => self.axis2,
        }
    }

    /// Whether any axis is crossed.
    #[must_use]
    pub fn any(&self) -> bool {
        self.axis1 || self.axis2
    }

    /// Per-axis OR of two results.
    #[must_use]
    pub fn or(self, other: AxisCrossing) -> AxisCrossing {
        AxisCrossing {
            axis1: self.axis1 || other.axis1,
            axis2: self.axis2 || other.axis2,
        }
    }

    pub(crate) fn set(&mut self, axis: Axis, value: bool) {
        match axis {
            Axis::First => self.axis1 = value,
            Axis::Second => self.axis2 = value,
        }
    }
}

/// Crossing test for a point or circle centered at `center`.
///
/// `radius` is in coordinate units; `0` tests a bare point. The center is
/// wrapped into each axis' interval before the boundaries are tested.
#[must_use]
pub fn detect_point(center: Coord, radius: f64, bounds: &WrapBounds, min_distance: f64) -> AxisCrossing {
    let mut crossing = AxisCrossing::default();
    for axis in Axis::BOTH {
        if let Some(iv) = bounds.get(axis) {
            let value = iv.wrap(center[axis.index()]);
            crossing.set(axis, check_wrap_zone(value, radius, iv, min_distance));
        }
    }
    crossing
}

/// Crossing test for a line or polygon vertex set.
///
/// Nested rings are tested independently and OR-ed per axis.
#[must_use]
pub fn detect_vertices(vertices: &Vertices, bounds: &WrapBounds, min_distance: f64) -> AxisCrossing {
    match vertices {
        Vertices::Flat(coords) => {
            let mut crossing = AxisCrossing::default();
            for axis in Axis::BOTH {
                if let Some(iv) = bounds.get(axis) {
                    crossing.set(axis, ring_crosses(coords, axis, iv, min_distance));
                }
            }
            crossing
        }
        Vertices::Nested(rings) => rings
            .iter()
            .map(|ring| detect_vertices(ring, bounds, min_distance))
            .fold(AxisCrossing::default(), AxisCrossing::or),
    }
}

/// Whether a value with extent `radius` straddles either end of `iv`.
#[must_use]
pub fn check_wrap_zone(value: f64, radius: f64, iv: Interval, min_distance: f64) -> bool {
    straddles(value, radius, iv.low, min_distance) || straddles(value, radius, iv.high, min_distance)
}

fn straddles(value: f64, radius: f64, boundary: f64, m: f64) -> bool {
    let d = value - boundary;
    let below = d - radius;
    let above = d + radius;

    (below <= m && above > -m) || (above <= m && below > -m)
}

/// Where a wrapped vertex sits relative to the wrap line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    /// Within the buffer distance of a boundary.
    Force,
    /// Closer to the midpoint than to the wrap line.
    Safe,
    Side { left: bool, right: bool },
}

fn classify(value: f64, iv: Interval, m: f64) -> Zone {
    if value <= iv.low + m || value >= iv.high - m {
        return Zone::Force;
    }

    let mid = iv.midpoint();
    let quarter = iv.width() / 4.0;
    if value >= mid - quarter && value <= mid + quarter {
        return Zone::Safe;
    }

    Zone::Side {
        left: value < mid + m,
        right: value > mid - m,
    }
}

fn ring_crosses(coords: &[Coord], axis: Axis, iv: Interval, m: f64) -> bool {
    let mut left = false;
    let mut right = false;

    for c in coords {
        match classify(iv.wrap(c[axis.index()]), iv, m) {
            Zone::Force => return true,
            Zone::Safe => {}
            Zone::Side { left: l, right: r } => {
                left |= l;
                right |= r;
            }
        }
    }

    left && right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::coord;

    fn line(a: f64, b: f64) -> Vertices {
        Vertices::Flat(vec![coord(10.0, a), coord(10.0, b)])
    }

    #[test]
    fn adjacent_across_wrap_crosses() {
        let c = detect_vertices(&line(179.0, -179.0), &WrapBounds::world(), 0.0);
        assert!(c.axis2);
        assert!(!c.axis1);
    }

    #[test]
    fn line_at_midpoint_does_not_cross() {
        let c = detect_vertices(&line(0.0, 0.0), &WrapBounds::world(), 0.0);
        assert!(!c.any());
    }

    #[test]
    fn antimeridian_line_crosses() {
        let c = detect_vertices(&line(170.0, -170.0), &WrapBounds::world(), 0.0);
        assert!(c.axis2);
    }

    #[test]
    fn one_sided_line_does_not_cross() {
        let c = detect_vertices(&line(100.0, 170.0), &WrapBounds::world(), 0.0);
        assert!(!c.axis2);
    }

    #[test]
    fn buffer_forces_crossing_near_boundary() {
        let v = line(100.0, 175.0);
        assert!(!detect_vertices(&v, &WrapBounds::world(), 0.0).axis2);
        assert!(detect_vertices(&v, &WrapBounds::world(), 10.0).axis2);
    }

    #[test]
    fn unwrapped_input_is_wrapped_first() {
        // 190 aliases to -170, which sits opposite 170.
        let c = detect_vertices(&line(170.0, 190.0), &WrapBounds::world(), 0.0);
        assert!(c.axis2);
    }

    #[test]
    fn nested_rings_or_per_axis() {
        let v = Vertices::Nested(vec![line(0.0, 10.0), line(170.0, -170.0)]);
        assert!(detect_vertices(&v, &WrapBounds::world(), 0.0).axis2);

        // One side in each ring is not a crossing.
        let v = Vertices::Nested(vec![line(170.0, 160.0), line(-170.0, -160.0)]);
        assert!(!detect_vertices(&v, &WrapBounds::world(), 0.0).axis2);
    }

    #[test]
    fn axis_without_bounds_is_never_checked() {
        let c = detect_vertices(&line(170.0, -170.0), &WrapBounds::default(), 0.0);
        assert!(!c.any());
    }

    #[test]
    fn bare_point_needs_buffer() {
        let world = WrapBounds::world();
        assert!(!detect_point(coord(0.0, 179.0), 0.0, &world, 0.0).axis2);
        assert!(detect_point(coord(0.0, 179.0), 0.0, &world, 2.0).axis2);
        assert!(!detect_point(coord(0.0, 170.0), 0.0, &world, 2.0).axis2);
    }

    #[test]
    fn circle_straddling_boundary_crosses() {
        let world = WrapBounds::world();
        assert!(detect_point(coord(0.0, 175.0), 10.0, &world, 0.0).axis2);
        assert!(detect_point(coord(0.0, -175.0), 10.0, &world, 0.0).axis2);
        assert!(!detect_point(coord(0.0, 160.0), 10.0, &world, 0.0).axis2);
    }

    #[test]
    fn both_axes_checked_independently() {
        let bounds = WrapBounds {
            axis1: Some(Interval::new(-90.0, 90.0)),
            axis2: Some(Interval::new(-180.0, 180.0)),
        };
        let c = detect_point(coord(88.0, 0.0), 5.0, &bounds, 0.0);
        assert!(c.axis1);
        assert!(!c.axis2);
    }
}
