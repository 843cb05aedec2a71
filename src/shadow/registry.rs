use std::collections::BTreeMap;

use crate::analysis::Variant;
use crate::events::Listeners;
use crate::shape::ShapeId;

/// Live shadows of a primary, at most one per variant.
#[derive(Debug, Clone, Default)]
pub struct ShadowRegistry {
    active: BTreeMap<Variant, ShapeId>,
}

impl ShadowRegistry {
    /// Shadow holding `variant`, if live.
    #[must_use]
    pub fn get(&self, variant: Variant) -> Option<ShapeId> {
        self.active.get(&variant).copied()
    }

    #[must_use]
    pub fn contains(&self, variant: Variant) -> bool {
        self.active.contains_key(&variant)
    }

    /// Live shadows in variant order.
    #[must_use]
    pub fn shadows(&self) -> Vec<(Variant, ShapeId)> {
        self.active.iter().map(|(v, id)| (*v, *id)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub(crate) fn insert(&mut self, variant: Variant, shadow: ShapeId) {
        self.active.insert(variant, shadow);
    }

    pub(crate) fn remove(&mut self, variant: Variant) -> Option<ShapeId> {
        self.active.remove(&variant)
    }
}

/// A detached shadow with the subscriptions stripped from it.
#[derive(Debug, Clone)]
pub struct CachedShadow {
    pub shape: ShapeId,
    pub listeners: Listeners,
}

/// Recently removed shadows of a primary, keyed by variant.
#[derive(Debug, Clone, Default)]
pub struct RemovalCache {
    entries: BTreeMap<Variant, CachedShadow>,
}

impl RemovalCache {
    /// Cached shadow for `variant`.
    #[must_use]
    pub fn get(&self, variant: Variant) -> Option<&CachedShadow> {
        self.entries.get(&variant)
    }

    #[must_use]
    pub fn contains(&self, variant: Variant) -> bool {
        self.entries.contains_key(&variant)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Caches `entry`, returning the one it displaced.
    pub(crate) fn insert(&mut self, variant: Variant, entry: CachedShadow) -> Option<CachedShadow> {
        self.entries.insert(variant, entry)
    }

    pub(crate) fn take(&mut self, variant: Variant) -> Option<CachedShadow> {
        self.entries.remove(&variant)
    }

    /// Removes every entry.
    pub(crate) fn drain(&mut self) -> Vec<CachedShadow> {
        std::mem::take(&mut self.entries).into_values().collect()
    }
}
