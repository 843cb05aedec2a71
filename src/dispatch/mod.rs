//! Tracked operations: their names, arguments, categories and implementations.

pub mod builtin;
pub mod methods;
pub mod ops;
pub mod table;
mod value;

pub use methods::{Method, MethodTable, OpFn, Originals};
pub use table::DispatchTable;
pub use value::{Args, Value};

/// How a tracked operation is propagated from a primary to its shadows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchCategory {
    /// Replayed verbatim.
    Simple,
    /// Argument `arg` is a coordinate re-expressed in each shape's variant.
    Translated { arg: usize },
    /// Replayed verbatim after the shadow set is reconciled.
    Rechecked,
    /// Translated and rechecked; used for moves.
    TranslatedRechecked { arg: usize },
    /// Vertex-list replacement; shadows receive their own vertex lists.
    MultiVertex,
    /// Argument conversion only, outside the dispatch protocol.
    Structural,
}

impl DispatchCategory {
    /// Index of the coordinate argument translated per variant.
    #[must_use]
    pub fn translated_arg(self) -> Option<usize> {
        match self {
            DispatchCategory::Translated { arg } | DispatchCategory::TranslatedRechecked { arg } => {
                Some(arg)
            }
            _ => None,
        }
    }

    /// Whether the shadow set is reconciled after the primary executes.
    #[must_use]
    pub fn rechecks(self) -> bool {
        matches!(
            self,
            DispatchCategory::Rechecked | DispatchCategory::TranslatedRechecked { .. }
        )
    }
}
