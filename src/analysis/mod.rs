pub mod crossing;
pub mod transform;
pub mod variant;

pub use crossing::{check_wrap_zone, detect_point, detect_vertices, AxisCrossing};
pub use transform::{AxisMirror, CrossingInfo, MirrorDirection, ShadowPlan};
pub use variant::{Variant, VariantMap};
