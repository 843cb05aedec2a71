use thiserror::Error;

use crate::shape::{ShapeId, ShapeKind};

/// Top-level error type for shadowwrap.
#[derive(Debug, Error)]
pub enum ShadowWrapError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to shapes held by a scene.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("shape not found: {0:?}")]
    NotFound(ShapeId),

    #[error("shape {0:?} is a shadow and follows its primary")]
    ShadowManaged(ShapeId),

    #[error("{kind:?} does not carry {expected} geometry")]
    WrongGeometry {
        kind: ShapeKind,
        expected: &'static str,
    },
}

/// Errors raised while invoking shape operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("operation `{op}` is not defined for {kind:?}")]
    UnknownOperation { kind: ShapeKind, op: String },

    #[error("operation `{op}` expects {expected} at argument {index}")]
    InvalidArgument {
        op: String,
        index: usize,
        expected: &'static str,
    },

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`ShadowWrapError`].
pub type Result<T> = std::result::Result<T, ShadowWrapError>;
