/// Concrete kind of a shape, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// Single point with an icon.
    Marker,
    /// Circle with a radius in screen pixels.
    CircleMarker,
    /// Circle with a radius in physical units (metres on earth maps).
    Circle,
    /// Open line through its vertices.
    Polyline,
    /// Closed ring(s).
    Polygon,
    /// Axis-aligned polygon built from bounds.
    Rectangle,
}

impl ShapeKind {
    /// Every concrete kind.
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Marker,
        ShapeKind::CircleMarker,
        ShapeKind::Circle,
        ShapeKind::Polyline,
        ShapeKind::Polygon,
        ShapeKind::Rectangle,
    ];

    /// Class chain of this kind, most derived first.
    ///
    /// Operation lookup walks this chain, so a definition on `Polygon`
    /// overrides the one on `Polyline` for polygons and rectangles.
    #[must_use]
    pub fn ancestry(self) -> &'static [ShapeClass] {
        use ShapeClass as C;
        match self {
            ShapeKind::Marker => &[C::Marker, C::Layer],
            ShapeKind::CircleMarker => &[C::CircleMarker, C::Path, C::Layer],
            ShapeKind::Circle => &[C::Circle, C::CircleMarker, C::Path, C::Layer],
            ShapeKind::Polyline => &[C::Polyline, C::Path, C::Layer],
            ShapeKind::Polygon => &[C::Polygon, C::Polyline, C::Path, C::Layer],
            ShapeKind::Rectangle => &[C::Rectangle, C::Polygon, C::Polyline, C::Path, C::Layer],
        }
    }

    /// Whether the shape is described by a vertex list rather than one point.
    #[must_use]
    pub fn is_multi_vertex(self) -> bool {
        matches!(
            self,
            ShapeKind::Polyline | ShapeKind::Polygon | ShapeKind::Rectangle
        )
    }

    /// Whether the kind belongs to `class`, directly or through inheritance.
    #[must_use]
    pub fn is_a(self, class: ShapeClass) -> bool {
        self.ancestry().contains(&class)
    }
}

/// Class in the shape hierarchy; the unit operations are defined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeClass {
    Layer,
    Path,
    Marker,
    CircleMarker,
    Circle,
    Polyline,
    Polygon,
    Rectangle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestry_starts_with_own_class() {
        assert_eq!(ShapeKind::Rectangle.ancestry()[0], ShapeClass::Rectangle);
        assert_eq!(ShapeKind::Circle.ancestry()[1], ShapeClass::CircleMarker);
    }

    #[test]
    fn markers_are_not_paths() {
        assert!(!ShapeKind::Marker.is_a(ShapeClass::Path));
        assert!(ShapeKind::CircleMarker.is_a(ShapeClass::Path));
        assert!(ShapeKind::Rectangle.is_a(ShapeClass::Polyline));
    }

    #[test]
    fn multi_vertex_kinds() {
        assert!(!ShapeKind::Circle.is_multi_vertex());
        assert!(ShapeKind::Polygon.is_multi_vertex());
    }
}
