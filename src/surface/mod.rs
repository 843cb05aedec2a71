//! Boundary with the display surface shapes are drawn on.

mod headless;

pub use headless::{Drawn, HeadlessSurface};

use crate::math::{Coord, WrapBounds};
use crate::shape::{Shape, ShapeId};

/// Display surface hosting the shapes of a scene.
///
/// The surface owns the wrap configuration of the coordinate space and draws
/// whatever coordinates it is handed, without wrapping them again.
pub trait Surface: 'static {
    /// Wrap interval of each axis; axes without an interval are never checked.
    fn wrap_bounds(&self) -> WrapBounds;

    /// Reduces a raw coordinate into the wrap intervals.
    fn wrap_coord(&self, c: Coord) -> Coord {
        self.wrap_bounds().wrap(c)
    }

    /// Radius of the sphere physical circle radii are measured on.
    ///
    /// `None` means circle radii are already in coordinate units.
    fn earth_radius(&self) -> Option<f64> {
        None
    }

    /// Converts a screen distance along axis 2 into coordinate units.
    fn pixels_to_units(&self, pixels: f64) -> f64;

    /// Starts drawing `shape`.
    fn add_shape(&mut self, id: ShapeId, shape: &Shape);

    /// Stops drawing a shape. Returns `false` if it was not drawn.
    fn remove_shape(&mut self, id: ShapeId) -> bool;

    /// Redraws `shape` from its current state.
    fn redraw(&mut self, id: ShapeId, shape: &Shape);
}
