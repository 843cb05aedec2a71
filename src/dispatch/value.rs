use crate::error::{OperationError, Result};
use crate::geometry::{Bounds, Style, Vertices};
use crate::math::Coord;
use crate::shape::ShapeId;

/// Argument or return value of an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Number(f64),
    Text(String),
    Coord(Coord),
    Vertices(Vertices),
    Bounds(Bounds),
    Style(Style),
    /// A shape; operations without a result return the shape they ran on.
    Shape(ShapeId),
}

impl Value {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// The shape this value refers to.
    #[must_use]
    pub fn as_shape(&self) -> Option<ShapeId> {
        match self {
            Value::Shape(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<Coord> for Value {
    fn from(c: Coord) -> Self {
        Value::Coord(c)
    }
}

impl From<Vertices> for Value {
    fn from(v: Vertices) -> Self {
        Value::Vertices(v)
    }
}

impl From<Style> for Value {
    fn from(s: Style) -> Self {
        Value::Style(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Option<Coord>> for Value {
    fn from(c: Option<Coord>) -> Self {
        c.map_or(Value::None, Value::Coord)
    }
}

/// Typed view of the arguments passed to an operation.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    op: &'a str,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    #[must_use]
    pub fn new(op: &'a str, values: &'a [Value]) -> Self {
        Self { op, values }
    }

    /// Raw argument at `index`; missing trailing arguments read as [`Value::None`].
    #[must_use]
    pub fn get(&self, index: usize) -> &'a Value {
        static NONE: Value = Value::None;
        self.values.get(index).unwrap_or(&NONE)
    }

    fn invalid(&self, index: usize, expected: &'static str) -> OperationError {
        OperationError::InvalidArgument {
            op: self.op.to_string(),
            index,
            expected,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not a coordinate.
    pub fn coord(&self, index: usize) -> Result<Coord> {
        match self.get(index) {
            Value::Coord(c) => Ok(*c),
            _ => Err(self.invalid(index, "a coordinate").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is neither a coordinate nor absent.
    pub fn opt_coord(&self, index: usize) -> Result<Option<Coord>> {
        match self.get(index) {
            Value::None => Ok(None),
            Value::Coord(c) => Ok(Some(*c)),
            _ => Err(self.invalid(index, "a coordinate or nothing").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not a number.
    pub fn number(&self, index: usize) -> Result<f64> {
        match self.get(index) {
            Value::Number(n) => Ok(*n),
            _ => Err(self.invalid(index, "a number").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not text.
    pub fn text(&self, index: usize) -> Result<&'a str> {
        match self.get(index) {
            Value::Text(s) => Ok(s),
            _ => Err(self.invalid(index, "text").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is neither text nor absent.
    pub fn opt_text(&self, index: usize) -> Result<Option<&'a str>> {
        match self.get(index) {
            Value::None => Ok(None),
            Value::Text(s) => Ok(Some(s)),
            _ => Err(self.invalid(index, "text or nothing").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not a style.
    pub fn style(&self, index: usize) -> Result<&'a Style> {
        match self.get(index) {
            Value::Style(s) => Ok(s),
            _ => Err(self.invalid(index, "a style").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not a vertex list.
    pub fn vertices(&self, index: usize) -> Result<&'a Vertices> {
        match self.get(index) {
            Value::Vertices(v) => Ok(v),
            _ => Err(self.invalid(index, "a vertex list").into()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the argument is not bounds.
    pub fn bounds(&self, index: usize) -> Result<Bounds> {
        match self.get(index) {
            Value::Bounds(b) => Ok(*b),
            _ => Err(self.invalid(index, "bounds").into()),
        }
    }
}
