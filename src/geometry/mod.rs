pub mod bounds;
pub mod style;
pub mod vertices;

pub use bounds::Bounds;
pub use style::Style;
pub use vertices::Vertices;
