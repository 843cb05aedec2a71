//! Per-shape shadow bookkeeping: role, recursion flags and the registry.

mod registry;
mod state;

pub use registry::{CachedShadow, RemovalCache, ShadowRegistry};
pub use state::{Flag, Role, ShadowState};
