//! Typed entry points for the standard operations.

use crate::dispatch::{ops, Value};
use crate::error::Result;
use crate::geometry::{Bounds, Style, Vertices};
use crate::math::Coord;
use crate::shape::ShapeId;
use crate::surface::Surface;

use super::Scene;

impl<S: Surface> Scene<S> {
    fn call(&mut self, id: ShapeId, op: &str, args: &[Value]) -> Result<()> {
        self.invoke(id, op, args).map(|_| ())
    }

    /// Merges `style` into the shape's style.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist or has no style.
    pub fn set_style(&mut self, id: ShapeId, style: Style) -> Result<()> {
        self.call(id, ops::SET_STYLE, &[Value::Style(style)])
    }

    /// Moves a marker or circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a point shape.
    pub fn set_lat_lng(&mut self, id: ShapeId, position: Coord) -> Result<()> {
        self.call(id, ops::SET_LAT_LNG, &[Value::Coord(position)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a circle.
    pub fn set_radius(&mut self, id: ShapeId, radius: f64) -> Result<()> {
        self.call(id, ops::SET_RADIUS, &[Value::Number(radius)])
    }

    /// Appends a vertex to a line or polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a path shape.
    pub fn add_lat_lng(&mut self, id: ShapeId, c: Coord) -> Result<()> {
        self.call(id, ops::ADD_LAT_LNG, &[Value::Coord(c)])
    }

    /// Replaces the vertices of a line or polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a path shape.
    pub fn set_lat_lngs(&mut self, id: ShapeId, vertices: impl Into<Vertices>) -> Result<()> {
        self.call(id, ops::SET_LAT_LNGS, &[Value::Vertices(vertices.into())])
    }

    /// Reshapes a rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a rectangle.
    pub fn set_bounds(&mut self, id: ShapeId, bounds: Bounds) -> Result<()> {
        self.call(id, ops::SET_BOUNDS, &[Value::Bounds(bounds)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn bind_tooltip(&mut self, id: ShapeId, content: &str) -> Result<()> {
        self.call(id, ops::BIND_TOOLTIP, &[Value::from(content)])
    }

    /// Opens the bound tooltip, optionally at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn open_tooltip(&mut self, id: ShapeId, anchor: Option<Coord>) -> Result<()> {
        self.call(id, ops::OPEN_TOOLTIP, &[Value::None, Value::from(anchor)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn close_tooltip(&mut self, id: ShapeId) -> Result<()> {
        self.call(id, ops::CLOSE_TOOLTIP, &[])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn bind_popup(&mut self, id: ShapeId, content: &str) -> Result<()> {
        self.call(id, ops::BIND_POPUP, &[Value::from(content)])
    }

    /// Opens the bound popup, optionally at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn open_popup(&mut self, id: ShapeId, anchor: Option<Coord>) -> Result<()> {
        self.call(id, ops::OPEN_POPUP, &[Value::None, Value::from(anchor)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist.
    pub fn close_popup(&mut self, id: ShapeId) -> Result<()> {
        self.call(id, ops::CLOSE_POPUP, &[])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a path.
    pub fn bring_to_front(&mut self, id: ShapeId) -> Result<()> {
        self.call(id, ops::BRING_TO_FRONT, &[])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a path.
    pub fn bring_to_back(&mut self, id: ShapeId) -> Result<()> {
        self.call(id, ops::BRING_TO_BACK, &[])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a path.
    pub fn redraw(&mut self, id: ShapeId) -> Result<()> {
        self.call(id, ops::REDRAW, &[])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a marker.
    pub fn set_icon(&mut self, id: ShapeId, icon: &str) -> Result<()> {
        self.call(id, ops::SET_ICON, &[Value::from(icon)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a marker.
    pub fn set_opacity(&mut self, id: ShapeId, opacity: f64) -> Result<()> {
        self.call(id, ops::SET_OPACITY, &[Value::Number(opacity)])
    }

    /// # Errors
    ///
    /// Returns an error if the shape does not exist or is not a marker.
    pub fn set_z_index_offset(&mut self, id: ShapeId, offset: f64) -> Result<()> {
        self.call(id, ops::SET_Z_INDEX_OFFSET, &[Value::Number(offset)])
    }
}
