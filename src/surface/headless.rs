use std::collections::BTreeMap;

use crate::geometry::Style;
use crate::math::WrapBounds;
use crate::shape::{Geometry, Shape, ShapeId};

use super::Surface;

/// Snapshot of a shape as last drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawn {
    pub geometry: Geometry,
    pub style: Style,
    pub radius: f64,
}

impl Drawn {
    fn of(shape: &Shape) -> Self {
        Self {
            geometry: shape.geometry().clone(),
            style: shape.style.clone(),
            radius: shape.radius(),
        }
    }
}

/// In-memory surface that records what it draws.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    bounds: WrapBounds,
    earth_radius: Option<f64>,
    units_per_pixel: f64,
    drawn: BTreeMap<ShapeId, Drawn>,
    redraws: BTreeMap<ShapeId, usize>,
}

impl HeadlessSurface {
    /// Mean earth radius in metres.
    pub const EARTH_RADIUS: f64 = 6_371_000.0;

    /// A surface with custom wrap bounds and a 1:1 pixel scale.
    #[must_use]
    pub fn new(bounds: WrapBounds) -> Self {
        Self {
            bounds,
            earth_radius: None,
            units_per_pixel: 1.0,
            drawn: BTreeMap::new(),
            redraws: BTreeMap::new(),
        }
    }

    /// A world map at zoom 0: axis 2 wraps in `[-180, 180]`, 256 pixels span it.
    #[must_use]
    pub fn world() -> Self {
        Self {
            earth_radius: Some(Self::EARTH_RADIUS),
            units_per_pixel: 360.0 / 256.0,
            ..Self::new(WrapBounds::world())
        }
    }

    #[must_use]
    pub fn with_units_per_pixel(mut self, units: f64) -> Self {
        self.units_per_pixel = units;
        self
    }

    #[must_use]
    pub fn with_earth_radius(mut self, radius: Option<f64>) -> Self {
        self.earth_radius = radius;
        self
    }

    /// Whether the shape is currently drawn.
    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.drawn.contains_key(&id)
    }

    /// Last drawn state of a shape.
    #[must_use]
    pub fn drawn(&self, id: ShapeId) -> Option<&Drawn> {
        self.drawn.get(&id)
    }

    /// Number of drawn shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drawn.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drawn.is_empty()
    }

    /// How often a shape was redrawn since it was added.
    #[must_use]
    pub fn redraw_count(&self, id: ShapeId) -> usize {
        self.redraws.get(&id).copied().unwrap_or(0)
    }
}

impl Surface for HeadlessSurface {
    fn wrap_bounds(&self) -> WrapBounds {
        self.bounds
    }

    fn earth_radius(&self) -> Option<f64> {
        self.earth_radius
    }

    fn pixels_to_units(&self, pixels: f64) -> f64 {
        (pixels * self.units_per_pixel).abs()
    }

    fn add_shape(&mut self, id: ShapeId, shape: &Shape) {
        self.drawn.insert(id, Drawn::of(shape));
        self.redraws.insert(id, 0);
    }

    fn remove_shape(&mut self, id: ShapeId) -> bool {
        self.redraws.remove(&id);
        self.drawn.remove(&id).is_some()
    }

    fn redraw(&mut self, id: ShapeId, shape: &Shape) {
        if let Some(drawn) = self.drawn.get_mut(&id) {
            *drawn = Drawn::of(shape);
            *self.redraws.entry(id).or_insert(0) += 1;
        }
    }
}
