pub mod kind;

pub use kind::{ShapeClass, ShapeKind};

use crate::analysis::Variant;
use crate::error::ShapeError;
use crate::events::Listeners;
use crate::geometry::{Bounds, Style, Vertices};
use crate::math::Coord;
use crate::shadow::{RemovalCache, Role, ShadowState};

slotmap::new_key_type! {
    /// Unique identifier for a shape in a scene.
    pub struct ShapeId;
}

/// Position data of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Center of a marker or circle.
    Point(Coord),
    /// Vertices of a line, polygon or rectangle.
    Path(Vertices),
}

/// Bound tooltip or popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub content: String,
    pub open: bool,
    /// Where the overlay is opened; `None` anchors it on the shape itself.
    pub anchor: Option<Coord>,
}

impl Overlay {
    /// A closed overlay showing `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            open: false,
            anchor: None,
        }
    }
}

/// Draw-order request relative to sibling shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stacking {
    #[default]
    Natural,
    Front,
    Back,
}

/// A shape placed in a scene: a primary, a shadow, or an opted-out shape.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: ShapeKind,
    geometry: Geometry,
    radius: f64,
    pub style: Style,
    pub icon: Option<String>,
    pub opacity: f64,
    pub z_index_offset: f64,
    pub stacking: Stacking,
    pub tooltip: Option<Overlay>,
    pub popup: Option<Overlay>,
    pub(crate) no_shadow: bool,
    pub(crate) attached: bool,
    pub(crate) shadow: Option<ShadowState>,
    pub(crate) listeners: Listeners,
    pub(crate) cache: RemovalCache,
}

impl Shape {
    fn new(kind: ShapeKind, geometry: Geometry, radius: f64) -> Self {
        Self {
            kind,
            geometry,
            radius,
            style: Style::new(),
            icon: None,
            opacity: 1.0,
            z_index_offset: 0.0,
            stacking: Stacking::Natural,
            tooltip: None,
            popup: None,
            no_shadow: false,
            attached: false,
            shadow: None,
            listeners: Listeners::default(),
            cache: RemovalCache::default(),
        }
    }

    /// A marker at `position`.
    #[must_use]
    pub fn marker(position: Coord) -> Self {
        Self::new(ShapeKind::Marker, Geometry::Point(position), 0.0)
    }

    /// A circle marker with a radius in pixels.
    #[must_use]
    pub fn circle_marker(center: Coord, radius_px: f64) -> Self {
        Self::new(ShapeKind::CircleMarker, Geometry::Point(center), radius_px)
    }

    /// A circle with a physical radius.
    #[must_use]
    pub fn circle(center: Coord, radius: f64) -> Self {
        Self::new(ShapeKind::Circle, Geometry::Point(center), radius)
    }

    /// An open line.
    #[must_use]
    pub fn polyline(vertices: impl Into<Vertices>) -> Self {
        Self::new(ShapeKind::Polyline, Geometry::Path(vertices.into()), 0.0)
    }

    /// A polygon; an explicit closing vertex is dropped.
    #[must_use]
    pub fn polygon(vertices: impl Into<Vertices>) -> Self {
        let vertices = vertices.into().without_closing_vertex();
        Self::new(ShapeKind::Polygon, Geometry::Path(vertices), 0.0)
    }

    /// A rectangle covering `bounds`.
    #[must_use]
    pub fn rectangle(bounds: Bounds) -> Self {
        Self::new(ShapeKind::Rectangle, Geometry::Path(bounds.ring()), 0.0)
    }

    /// Returns the shape with `style` applied.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style.merge(&style);
        self
    }

    /// Returns the shape opted out of shadowing.
    #[must_use]
    pub fn without_shadow(mut self) -> Self {
        self.no_shadow = true;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Center of a point shape.
    #[must_use]
    pub fn position(&self) -> Option<Coord> {
        match &self.geometry {
            Geometry::Point(c) => Some(*c),
            Geometry::Path(_) => None,
        }
    }

    /// Vertex list of the shape; point shapes yield a single vertex.
    #[must_use]
    pub fn vertices(&self) -> Vertices {
        match &self.geometry {
            Geometry::Point(c) => Vertices::Flat(vec![*c]),
            Geometry::Path(v) => v.clone(),
        }
    }

    /// Whether the shape is on a display surface.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether the shape is opted out of shadowing.
    #[must_use]
    pub fn is_unshadowed(&self) -> bool {
        self.no_shadow
    }

    /// Whether this shape is a shadow of another shape.
    #[must_use]
    pub fn is_shadow(&self) -> bool {
        matches!(
            self.shadow.as_ref().map(|s| &s.role),
            Some(Role::Shadow { .. })
        )
    }

    /// Primary this shadow belongs to.
    #[must_use]
    pub fn primary(&self) -> Option<ShapeId> {
        match self.shadow.as_ref().map(|s| &s.role) {
            Some(Role::Shadow { primary }) => Some(*primary),
            _ => None,
        }
    }

    /// Coordinate representation the shape holds, if it takes part in shadowing.
    #[must_use]
    pub fn variant(&self) -> Option<Variant> {
        self.shadow.as_ref().map(|s| s.variant)
    }

    /// Shadow bookkeeping, absent for opted-out shapes.
    #[must_use]
    pub fn shadow_state(&self) -> Option<&ShadowState> {
        self.shadow.as_ref()
    }

    /// Shadows detached from this primary and kept for restoration.
    #[must_use]
    pub fn removal_cache(&self) -> &RemovalCache {
        &self.cache
    }

    /// Number of event subscriptions on the shape.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Moves a point shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is described by vertices.
    pub fn set_position(&mut self, c: Coord) -> Result<(), ShapeError> {
        match &mut self.geometry {
            Geometry::Point(p) => {
                *p = c;
                Ok(())
            }
            Geometry::Path(_) => Err(ShapeError::WrongGeometry {
                kind: self.kind,
                expected: "point",
            }),
        }
    }

    /// Replaces the vertex list of a path shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is a point shape.
    pub fn set_path(&mut self, vertices: Vertices) -> Result<(), ShapeError> {
        match &mut self.geometry {
            Geometry::Path(v) => {
                *v = vertices;
                Ok(())
            }
            Geometry::Point(_) => Err(ShapeError::WrongGeometry {
                kind: self.kind,
                expected: "vertex list",
            }),
        }
    }

    /// Mutable vertex list of a path shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is a point shape.
    pub fn path_mut(&mut self) -> Result<&mut Vertices, ShapeError> {
        match &mut self.geometry {
            Geometry::Path(v) => Ok(v),
            Geometry::Point(_) => Err(ShapeError::WrongGeometry {
                kind: self.kind,
                expected: "vertex list",
            }),
        }
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Replaces the geometry from a vertex list, whatever the shape kind.
    ///
    /// Point shapes take the first vertex; an empty list leaves them in place.
    pub(crate) fn assign_vertices(&mut self, vertices: &Vertices) {
        match &mut self.geometry {
            Geometry::Point(p) => {
                if let Some(first) = vertices.first() {
                    *p = first;
                }
            }
            Geometry::Path(v) => *v = vertices.clone(),
        }
    }

    /// Copy of the visible state for a shadow holding `vertices`.
    ///
    /// Subscriptions, cached shadows and shadow bookkeeping are not carried over.
    pub(crate) fn shadow_copy(&self, vertices: &Vertices) -> Shape {
        let mut copy = Shape::new(self.kind, self.geometry.clone(), self.radius);
        copy.assign_vertices(vertices);
        copy.copy_appearance(self);
        copy
    }

    /// Takes over the radius, style and options of `source`; overlays arrive closed.
    pub(crate) fn copy_appearance(&mut self, source: &Shape) {
        self.radius = source.radius;
        self.style.clone_from(&source.style);
        self.icon.clone_from(&source.icon);
        self.opacity = source.opacity;
        self.z_index_offset = source.z_index_offset;
        self.stacking = source.stacking;
        self.tooltip = source.tooltip.clone().map(|t| Overlay { open: false, ..t });
        self.popup = source.popup.clone().map(|p| Overlay { open: false, ..p });
    }
}
