use crate::geometry::Vertices;
use crate::math::{Axis, Coord, Interval, WrapBounds};

use super::crossing::AxisCrossing;
use super::variant::{Variant, VariantMap};

/// Which half of the doubled wrap range an axis normalizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorDirection {
    /// Mean at or above the midpoint: canonical range is `[mid, mid + w)`.
    Upper,
    /// Mean below the midpoint: canonical range is `[mid - w, mid)`.
    Lower,
}

/// Normalize/mirror parameters of one crossed axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMirror {
    pub interval: Interval,
    pub direction: MirrorDirection,
}

impl AxisMirror {
    /// Moves a wrapped value into the canonical range.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let mid = self.interval.midpoint();
        match self.direction {
            MirrorDirection::Upper if value < mid => value + self.interval.width(),
            MirrorDirection::Lower if value >= mid => value - self.interval.width(),
            _ => value,
        }
    }

    /// Moves a value to the other side of the wrap line.
    ///
    /// Involution on canonical and mirrored values alike.
    #[must_use]
    pub fn flip(&self, value: f64) -> f64 {
        if value >= self.interval.midpoint() {
            value - self.interval.width()
        } else {
            value + self.interval.width()
        }
    }
}

/// Crossing state of a primary shape, recomputed on every geometry change.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossingInfo {
    pub crossing: AxisCrossing,
    /// Mean of the wrapped coordinates on each crossed axis.
    pub center: Coord,
    axis1: Option<AxisMirror>,
    axis2: Option<AxisMirror>,
}

impl CrossingInfo {
    /// Picks the mirror direction of every crossed axis by the mean of `wrapped`.
    ///
    /// A crossed axis without an interval in `bounds` is treated as not
    /// crossed.
    #[must_use]
    pub fn new(crossing: AxisCrossing, wrapped: &Vertices, bounds: &WrapBounds) -> Self {
        let coords = wrapped.coords();
        let mut center = Coord::origin();
        let mut effective = AxisCrossing::default();
        let mut mirrors = [None, None];

        for axis in Axis::BOTH {
            let Some(interval) = bounds.get(axis).filter(|_| crossing.on(axis)) else {
                continue;
            };

            let i = axis.index();
            if !coords.is_empty() {
                #[allow(clippy::cast_precision_loss)]
                let len = coords.len() as f64;
                center[i] = coords.iter().map(|c| c[i]).sum::<f64>() / len;
            }

            let direction = if center[i] >= interval.midpoint() {
                MirrorDirection::Upper
            } else {
                MirrorDirection::Lower
            };
            mirrors[i] = Some(AxisMirror { interval, direction });
            effective.set(axis, true);
        }

        let [axis1, axis2] = mirrors;
        Self {
            crossing: effective,
            center,
            axis1,
            axis2,
        }
    }

    /// Normalize/mirror parameters of `axis`, present only when it is crossed.
    #[must_use]
    pub fn mirror(&self, axis: Axis) -> Option<&AxisMirror> {
        match axis {
            Axis::First => self.axis1.as_ref(),
            Axis::Second => self.axis2.as_ref(),
        }
    }

    /// Whether a shadow holding `variant` is needed.
    #[must_use]
    pub fn needs(&self, variant: Variant) -> bool {
        Axis::BOTH
            .into_iter()
            .all(|axis| !variant.mirrors(axis) || self.crossing.on(axis))
    }

    /// Canonical representation of a wrapped coordinate.
    #[must_use]
    pub fn normalize(&self, wrapped: Coord) -> Coord {
        self.map_axes(wrapped, |_, m, v| m.normalize(v))
    }

    /// Flips axis 1 of a canonical (or axis-1-mirrored) coordinate.
    #[must_use]
    pub fn mirror_axis1(&self, c: Coord) -> Coord {
        self.map_axes(c, |axis, m, v| if axis == Axis::First { m.flip(v) } else { v })
    }

    /// Flips axis 2 of a canonical (or axis-2-mirrored) coordinate.
    #[must_use]
    pub fn mirror_axis2(&self, c: Coord) -> Coord {
        self.map_axes(c, |axis, m, v| if axis == Axis::Second { m.flip(v) } else { v })
    }

    /// Flips both axes of a canonical (or fully mirrored) coordinate.
    #[must_use]
    pub fn mirror_both(&self, c: Coord) -> Coord {
        self.map_axes(c, |_, m, v| m.flip(v))
    }

    /// Expresses a wrapped coordinate in `variant`'s representation.
    #[must_use]
    pub fn to_variant(&self, variant: Variant, wrapped: Coord) -> Coord {
        let canonical = self.normalize(wrapped);
        match variant {
            Variant::Identity => canonical,
            Variant::MirrorAxis1 => self.mirror_axis1(canonical),
            Variant::MirrorAxis2 => self.mirror_axis2(canonical),
            Variant::MirrorBoth => self.mirror_both(canonical),
        }
    }

    /// Computes every needed variant of a wrapped vertex set.
    #[must_use]
    pub fn plan(&self, wrapped: &Vertices) -> ShadowPlan {
        ShadowPlan {
            vertices: VariantMap::from_fn(|variant| {
                self.needs(variant)
                    .then(|| wrapped.map(&|c| self.to_variant(variant, c)))
            }),
        }
    }

    fn map_axes(&self, c: Coord, f: impl Fn(Axis, &AxisMirror, f64) -> f64) -> Coord {
        let mut out = c;
        for axis in Axis::BOTH {
            if let Some(m) = self.mirror(axis) {
                out[axis.index()] = f(axis, m, c[axis.index()]);
            }
        }
        out
    }
}

/// Per-variant vertex lists; a variant is populated iff a shape must hold it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadowPlan {
    pub vertices: VariantMap<Option<Vertices>>,
}

impl ShadowPlan {
    /// Plan that leaves `vertices` untouched in the shape's own variant.
    #[must_use]
    pub fn passthrough(own: Variant, vertices: Vertices) -> Self {
        let mut plan = Self::default();
        plan.vertices[own] = Some(vertices);
        plan
    }

    /// Whether a shape holding `variant` must exist.
    #[must_use]
    pub fn needs(&self, variant: Variant) -> bool {
        self.vertices[variant].is_some()
    }

    /// Vertex list for `variant`, if needed.
    #[must_use]
    pub fn get(&self, variant: Variant) -> Option<&Vertices> {
        self.vertices[variant].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::crossing::detect_vertices;
    use crate::math::coord;
    use approx::assert_relative_eq;

    fn info_for(vertices: &Vertices, bounds: &WrapBounds) -> CrossingInfo {
        let crossing = detect_vertices(vertices, bounds, 0.0);
        let wrapped = vertices.map(&|c| bounds.wrap(c));
        CrossingInfo::new(crossing, &wrapped, bounds)
    }

    fn antimeridian_line() -> Vertices {
        Vertices::Flat(vec![coord(10.0, 170.0), coord(10.0, -170.0)])
    }

    #[test]
    fn antimeridian_line_plan() {
        let bounds = WrapBounds::world();
        let v = antimeridian_line();
        let info = info_for(&v, &bounds);
        assert!(info.crossing.axis2);
        assert_eq!(info.mirror(Axis::Second).map(|m| m.direction), Some(MirrorDirection::Upper));

        let plan = info.plan(&v);
        assert!(plan.needs(Variant::Identity));
        assert!(plan.needs(Variant::MirrorAxis2));
        assert!(!plan.needs(Variant::MirrorAxis1));
        assert!(!plan.needs(Variant::MirrorBoth));

        let identity = plan.get(Variant::Identity).map(Vertices::coords).unwrap_or_default();
        assert_eq!(identity, vec![coord(10.0, 170.0), coord(10.0, 190.0)]);

        let mirrored = plan.get(Variant::MirrorAxis2).map(Vertices::coords).unwrap_or_default();
        assert_eq!(mirrored, vec![coord(10.0, -190.0), coord(10.0, -170.0)]);
    }

    #[test]
    fn majority_below_midpoint_normalizes_down() {
        let bounds = WrapBounds::world();
        let v = Vertices::Flat(vec![coord(0.0, 175.0), coord(0.0, -170.0), coord(0.0, -160.0)]);
        let info = info_for(&v, &bounds);
        assert_eq!(info.mirror(Axis::Second).map(|m| m.direction), Some(MirrorDirection::Lower));

        let identity = info.plan(&v).get(Variant::Identity).map(Vertices::coords).unwrap_or_default();
        assert_eq!(identity, vec![coord(0.0, -185.0), coord(0.0, -170.0), coord(0.0, -160.0)]);
    }

    #[test]
    fn normalize_is_idempotent() {
        let bounds = WrapBounds::world();
        let info = info_for(&antimeridian_line(), &bounds);
        for raw in [-179.0, -90.0, 0.0, 45.0, 179.0] {
            let once = info.normalize(bounds.wrap(coord(5.0, raw)));
            assert_eq!(info.normalize(once), once);
        }
    }

    #[test]
    fn mirror_both_round_trips() {
        let bounds = WrapBounds {
            axis1: Some(Interval::new(-90.0, 90.0)),
            axis2: Some(Interval::new(-180.0, 180.0)),
        };
        let v = Vertices::Flat(vec![coord(85.0, 170.0), coord(-85.0, -170.0)]);
        let info = info_for(&v, &bounds);
        assert!(info.crossing.axis1 && info.crossing.axis2);

        for raw in [coord(85.0, 170.0), coord(-85.0, -170.0), coord(10.0, 20.0)] {
            let n = info.normalize(bounds.wrap(raw));
            let back = info.mirror_both(info.mirror_both(n));
            assert_relative_eq!(back, n);
        }
    }

    #[test]
    fn mirror_shifts_by_interval_width() {
        let bounds = WrapBounds::world();
        let info = info_for(&antimeridian_line(), &bounds);
        let n = info.normalize(coord(10.0, -170.0));
        assert_relative_eq!(n.y - info.mirror_axis2(n).y, 360.0);
        // Axis 1 does not cross, so mirroring it is a no-op.
        assert_eq!(info.mirror_axis1(n), n);
    }

    #[test]
    fn uncrossed_axes_populate_identity_only() {
        let bounds = WrapBounds::world();
        let v = Vertices::Flat(vec![coord(0.0, 10.0), coord(0.0, 20.0)]);
        let plan = info_for(&v, &bounds).plan(&v);
        assert!(plan.needs(Variant::Identity));
        for variant in [Variant::MirrorAxis1, Variant::MirrorAxis2, Variant::MirrorBoth] {
            assert!(!plan.needs(variant));
        }
        assert_eq!(plan.get(Variant::Identity), Some(&v));
    }

    #[test]
    fn crossing_without_bounds_is_dropped() {
        let forced = AxisCrossing { axis1: true, axis2: true };
        let info = CrossingInfo::new(forced, &antimeridian_line(), &WrapBounds::world());
        assert!(!info.crossing.axis1);
        assert!(info.crossing.axis2);
    }

    #[test]
    fn nested_rings_share_one_direction() {
        let bounds = WrapBounds::world();
        let v = Vertices::Nested(vec![
            Vertices::Flat(vec![coord(0.0, 170.0), coord(0.0, -170.0)]),
            Vertices::Flat(vec![coord(5.0, 175.0)]),
        ]);
        let plan = info_for(&v, &bounds).plan(&v);
        let Some(Vertices::Nested(rings)) = plan.get(Variant::MirrorAxis2) else {
            panic!("mirror variant missing");
        };
        assert_eq!(rings[1].coords(), vec![coord(5.0, -185.0)]);
    }
}
