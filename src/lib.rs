//! Shadow copies of shapes drawn on a wrap-around coordinate space.
//!
//! A shape whose extent crosses a wrap boundary (the antimeridian on a world
//! map) gets up to three shadows, one per mirrored representation, so it stays
//! visible from every wrap period. Operations invoked on any of them run once
//! on the primary and are replayed onto the shadows.

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod geometry;
pub mod math;
pub mod scene;
pub mod shadow;
pub mod shape;
pub mod surface;

pub use analysis::{CrossingInfo, ShadowPlan, Variant};
pub use config::{ExceptionTable, ShadowConfig};
pub use dispatch::{DispatchCategory, DispatchTable, Value};
pub use error::{Result, ShadowWrapError};
pub use geometry::{Bounds, Style, Vertices};
pub use math::{coord, Coord};
pub use scene::{OpContext, Scene, SceneBuilder};
pub use shape::{Shape, ShapeClass, ShapeId, ShapeKind};
pub use surface::{HeadlessSurface, Surface};
