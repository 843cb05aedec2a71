use std::ops::{Index, IndexMut};

use crate::math::Axis;

/// Coordinate representation held by a shape.
///
/// The primary always holds [`Variant::Identity`]; every other variant is
/// held by at most one shadow of that primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Canonical, continuous representation.
    Identity,
    /// Identity with axis 1 flipped across the wrap boundary.
    MirrorAxis1,
    /// Identity with axis 2 flipped across the wrap boundary.
    MirrorAxis2,
    /// Identity with both axes flipped.
    MirrorBoth,
}

impl Variant {
    /// All variants, in registry iteration order.
    pub const ALL: [Variant; 4] = [
        Variant::Identity,
        Variant::MirrorAxis1,
        Variant::MirrorAxis2,
        Variant::MirrorBoth,
    ];

    fn index(self) -> usize {
        match self {
            Variant::Identity => 0,
            Variant::MirrorAxis1 => 1,
            Variant::MirrorAxis2 => 2,
            Variant::MirrorBoth => 3,
        }
    }

    /// Whether this variant flips `axis`.
    #[must_use]
    pub fn mirrors(self, axis: Axis) -> bool {
        match (self, axis) {
            (Variant::MirrorBoth, _)
            | (Variant::MirrorAxis1, Axis::First)
            | (Variant::MirrorAxis2, Axis::Second) => true,
            _ => false,
        }
    }
}

/// Fixed-size map with one slot per [`Variant`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantMap<T>([T; 4]);

impl<T> VariantMap<T> {
    /// Builds a map by evaluating `f` for every variant.
    pub fn from_fn(mut f: impl FnMut(Variant) -> T) -> Self {
        Self(Variant::ALL.map(&mut f))
    }

    /// Iterates `(variant, value)` pairs in variant order.
    pub fn iter(&self) -> impl Iterator<Item = (Variant, &T)> {
        Variant::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Variant> for VariantMap<T> {
    type Output = T;

    fn index(&self, variant: Variant) -> &T {
        &self.0[variant.index()]
    }
}

impl<T> IndexMut<Variant> for VariantMap<T> {
    fn index_mut(&mut self, variant: Variant) -> &mut T {
        &mut self.0[variant.index()]
    }
}
