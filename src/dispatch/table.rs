use std::collections::BTreeMap;

use crate::shape::ShapeClass;

use super::ops;
use super::DispatchCategory;

/// Declares which operations are tracked, per class, and how.
///
/// A definition on a class applies to every kind deriving from it unless a
/// more derived class defines the same operation.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: BTreeMap<(ShapeClass, String), DispatchCategory>,
}

impl DispatchTable {
    /// An empty table; nothing is tracked.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The table for the standard operations.
    #[must_use]
    pub fn standard() -> Self {
        use DispatchCategory::{MultiVertex, Rechecked, Simple, Structural};
        use ShapeClass as C;

        let mut table = Self::new();
        let moved = DispatchCategory::TranslatedRechecked { arg: 0 };

        for op in [
            ops::BIND_TOOLTIP,
            ops::UNBIND_TOOLTIP,
            ops::CLOSE_TOOLTIP,
            ops::TOGGLE_TOOLTIP,
            ops::BIND_POPUP,
            ops::UNBIND_POPUP,
            ops::CLOSE_POPUP,
            ops::TOGGLE_POPUP,
        ] {
            table.define(C::Layer, op, Simple);
        }
        table.define(C::Layer, ops::OPEN_TOOLTIP, DispatchCategory::Translated { arg: 1 });
        table.define(C::Layer, ops::OPEN_POPUP, DispatchCategory::Translated { arg: 1 });

        for op in [ops::BRING_TO_BACK, ops::BRING_TO_FRONT, ops::SET_STYLE, ops::REDRAW] {
            table.define(C::Path, op, Simple);
        }

        table.define(C::Polyline, ops::UPDATE, Simple);
        table.define(C::Polyline, ops::ADD_LAT_LNG, moved);
        // convert_lat_lngs stays untracked: only the setter reconciles shadows.
        for class in [C::Polyline, C::Polygon] {
            table.define(class, ops::SET_LAT_LNGS, MultiVertex);
        }

        table.define(C::Rectangle, ops::BOUNDS_TO_LAT_LNGS, Structural);

        for op in [ops::SET_Z_INDEX_OFFSET, ops::SET_ICON, ops::UPDATE, ops::SET_OPACITY] {
            table.define(C::Marker, op, Simple);
        }
        table.define(C::Marker, ops::SET_LAT_LNG, moved);

        table.define(C::CircleMarker, ops::SET_STYLE, Simple);
        table.define(C::CircleMarker, ops::UPDATE, Simple);
        for class in [C::CircleMarker, C::Circle] {
            table.define(class, ops::SET_RADIUS, Rechecked);
            table.define(class, ops::SET_LAT_LNG, moved);
        }

        table
    }

    /// Tracks `op` on `class`, replacing an earlier definition.
    pub fn define(&mut self, class: ShapeClass, op: impl Into<String>, category: DispatchCategory) {
        self.entries.insert((class, op.into()), category);
    }

    /// Stops tracking `op` on `class`. Returns the removed category.
    pub fn remove(&mut self, class: ShapeClass, op: &str) -> Option<DispatchCategory> {
        self.entries.remove(&(class, op.to_string()))
    }

    /// Category declared directly on `class`.
    #[must_use]
    pub fn get(&self, class: ShapeClass, op: &str) -> Option<DispatchCategory> {
        self.entries.get(&(class, op.to_string())).copied()
    }

    /// Every definition, ordered by class then operation name.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeClass, &str, DispatchCategory)> {
        self.entries
            .iter()
            .map(|((class, op), category)| (*class, op.as_str(), *category))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
