use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::error::Result;
use crate::scene::OpContext;
use crate::shape::{ShapeClass, ShapeKind};
use crate::surface::Surface;

use super::{builtin, ops, DispatchCategory, DispatchTable, Value};

/// Implementation of an operation, run without any shadow handling.
pub type OpFn<S> = Rc<dyn Fn(&mut OpContext<'_, S>, &[Value]) -> Result<Value>>;

/// Host implementations of operations, per class.
pub struct Originals<S: Surface> {
    entries: BTreeMap<(ShapeClass, String), OpFn<S>>,
}

impl<S: Surface> Default for Originals<S> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<S: Surface> fmt::Debug for Originals<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

impl<S: Surface> Originals<S> {
    /// Implementations of the standard operations.
    #[must_use]
    pub fn standard() -> Self {
        use ShapeClass as C;

        let mut o = Self::default();
        o.register(C::Layer, ops::BIND_TOOLTIP, builtin::bind_tooltip::<S>);
        o.register(C::Layer, ops::UNBIND_TOOLTIP, builtin::unbind_tooltip::<S>);
        o.register(C::Layer, ops::OPEN_TOOLTIP, builtin::open_tooltip::<S>);
        o.register(C::Layer, ops::CLOSE_TOOLTIP, builtin::close_tooltip::<S>);
        o.register(C::Layer, ops::TOGGLE_TOOLTIP, builtin::toggle_tooltip::<S>);
        o.register(C::Layer, ops::BIND_POPUP, builtin::bind_popup::<S>);
        o.register(C::Layer, ops::UNBIND_POPUP, builtin::unbind_popup::<S>);
        o.register(C::Layer, ops::OPEN_POPUP, builtin::open_popup::<S>);
        o.register(C::Layer, ops::CLOSE_POPUP, builtin::close_popup::<S>);
        o.register(C::Layer, ops::TOGGLE_POPUP, builtin::toggle_popup::<S>);

        o.register(C::Path, ops::BRING_TO_BACK, builtin::bring_to_back::<S>);
        o.register(C::Path, ops::BRING_TO_FRONT, builtin::bring_to_front::<S>);
        o.register(C::Path, ops::SET_STYLE, builtin::set_style::<S>);
        o.register(C::Path, ops::REDRAW, builtin::redraw::<S>);
        o.register(C::Path, ops::UPDATE, builtin::redraw::<S>);

        o.register(C::Marker, ops::SET_Z_INDEX_OFFSET, builtin::set_z_index_offset::<S>);
        o.register(C::Marker, ops::SET_ICON, builtin::set_icon::<S>);
        o.register(C::Marker, ops::SET_OPACITY, builtin::set_opacity::<S>);
        o.register(C::Marker, ops::UPDATE, builtin::redraw::<S>);
        o.register(C::Marker, ops::SET_LAT_LNG, builtin::set_lat_lng::<S>);

        o.register(C::CircleMarker, ops::SET_LAT_LNG, builtin::set_lat_lng::<S>);
        o.register(C::CircleMarker, ops::SET_RADIUS, builtin::set_radius::<S>);

        o.register(C::Polyline, ops::ADD_LAT_LNG, builtin::add_lat_lng::<S>);
        o.register(C::Polyline, ops::SET_LAT_LNGS, builtin::set_lat_lngs::<S>);
        o.register(C::Polyline, ops::CONVERT_LAT_LNGS, builtin::convert_lat_lngs::<S>);
        o.register(C::Polygon, ops::CONVERT_LAT_LNGS, builtin::convert_polygon_lat_lngs::<S>);

        o.register(C::Rectangle, ops::BOUNDS_TO_LAT_LNGS, builtin::bounds_to_lat_lngs::<S>);
        o.register(C::Rectangle, ops::SET_BOUNDS, builtin::set_bounds::<S>);
        o
    }

    /// Registers the implementation of `op` on `class`, replacing an earlier one.
    pub fn register<F>(&mut self, class: ShapeClass, op: impl Into<String>, f: F)
    where
        F: Fn(&mut OpContext<'_, S>, &[Value]) -> Result<Value> + 'static,
    {
        self.entries.insert((class, op.into()), Rc::new(f));
    }

    fn get(&self, class: ShapeClass, op: &str) -> Option<&OpFn<S>> {
        self.entries.get(&(class, op.to_string()))
    }

    fn ops(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|(_, op)| op.as_str())
    }
}

/// An operation resolved for one shape kind.
pub struct Method<S: Surface> {
    /// Dispatch category and the class declaring it; `None` when untracked.
    pub tracked: Option<(DispatchCategory, ShapeClass)>,
    pub original: OpFn<S>,
}

impl<S: Surface> Clone for Method<S> {
    fn clone(&self) -> Self {
        Self {
            tracked: self.tracked,
            original: Rc::clone(&self.original),
        }
    }
}

impl<S: Surface> fmt::Debug for Method<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("tracked", &self.tracked)
            .finish_non_exhaustive()
    }
}

/// Every operation of every kind, resolved once along the class chain.
pub struct MethodTable<S: Surface> {
    methods: BTreeMap<(ShapeKind, String), Method<S>>,
}

impl<S: Surface> fmt::Debug for MethodTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.methods.iter()).finish()
    }
}

impl<S: Surface> MethodTable<S> {
    /// Resolves the category and implementation of each operation per kind.
    ///
    /// The most derived class wins for both, independently. A tracked
    /// definition with no implementation anywhere in the chain is skipped.
    #[must_use]
    pub fn install(table: &DispatchTable, originals: &Originals<S>) -> Self {
        let names: BTreeSet<&str> = table.iter().map(|(_, op, _)| op).chain(originals.ops()).collect();
        let mut methods = BTreeMap::new();

        for kind in ShapeKind::ALL {
            for &op in &names {
                let tracked = kind
                    .ancestry()
                    .iter()
                    .find_map(|&class| table.get(class, op).map(|category| (category, class)));
                let original = kind
                    .ancestry()
                    .iter()
                    .find_map(|&class| originals.get(class, op));

                match (tracked, original) {
                    (_, Some(original)) => {
                        methods.insert(
                            (kind, op.to_string()),
                            Method {
                                tracked,
                                original: Rc::clone(original),
                            },
                        );
                    }
                    (Some((_, class)), None) => {
                        warn!(?kind, ?class, op, "tracked operation has no implementation");
                    }
                    (None, None) => {}
                }
            }
        }

        Self { methods }
    }

    /// Resolved operation `op` of `kind`.
    #[must_use]
    pub fn get(&self, kind: ShapeKind, op: &str) -> Option<&Method<S>> {
        self.methods.get(&(kind, op.to_string()))
    }

    /// Whether `kind` has an operation named `op`.
    #[must_use]
    pub fn contains(&self, kind: ShapeKind, op: &str) -> bool {
        self.get(kind, op).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    fn standard() -> MethodTable<HeadlessSurface> {
        MethodTable::install(&DispatchTable::standard(), &Originals::standard())
    }

    #[test]
    fn derived_definition_wins() {
        let methods = standard();
        let circle = methods.get(ShapeKind::Circle, ops::SET_STYLE);
        assert_eq!(
            circle.and_then(|m| m.tracked),
            Some((DispatchCategory::Simple, ShapeClass::CircleMarker))
        );
        let line = methods.get(ShapeKind::Polyline, ops::SET_STYLE);
        assert_eq!(
            line.and_then(|m| m.tracked),
            Some((DispatchCategory::Simple, ShapeClass::Path))
        );
    }

    #[test]
    fn untracked_operations_keep_their_implementation() {
        let methods = standard();
        let set_bounds = methods.get(ShapeKind::Rectangle, ops::SET_BOUNDS);
        assert!(set_bounds.is_some_and(|m| m.tracked.is_none()));
        assert!(!methods.contains(ShapeKind::Polygon, ops::SET_BOUNDS));
    }

    #[test]
    fn kinds_only_get_operations_of_their_chain() {
        let methods = standard();
        assert!(methods.contains(ShapeKind::Marker, ops::SET_ICON));
        assert!(!methods.contains(ShapeKind::Marker, ops::SET_STYLE));
        assert!(!methods.contains(ShapeKind::Polyline, ops::SET_RADIUS));
        assert!(methods.contains(ShapeKind::Rectangle, ops::ADD_LAT_LNG));
    }

    #[test]
    fn definition_without_implementation_is_skipped() {
        let mut table = DispatchTable::new();
        table.define(ShapeClass::Polyline, "set_text", DispatchCategory::Simple);
        let methods = MethodTable::<HeadlessSurface>::install(&table, &Originals::default());
        assert!(!methods.contains(ShapeKind::Polyline, "set_text"));
    }
}
