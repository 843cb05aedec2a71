//! Event subscriptions and notifications fired on shapes.

use std::fmt;
use std::rc::Rc;

use crate::analysis::Variant;
use crate::shape::ShapeId;

/// Fired on a primary after a shadow was created or restored.
pub const SHADOW_ADDED: &str = "shadow_added";

/// Fired on a primary after a shadow was detached into the removal cache.
pub const SHADOW_REMOVED: &str = "shadow_removed";

/// Interaction events forwarded from shadows to their primary by default.
pub const DEFAULT_FORWARDED_EVENTS: [&str; 6] = [
    "contextmenu",
    "click",
    "dblclick",
    "mousedown",
    "mouseover",
    "mouseout",
];

/// Callback invoked when an event fires.
pub type Handler = Rc<dyn Fn(&ShapeEvent)>;

/// Shadow that an event was forwarded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowOrigin {
    pub shadow: ShapeId,
    pub variant: Variant,
}

/// Payload of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDetail {
    None,
    /// The shadow a [`SHADOW_ADDED`]/[`SHADOW_REMOVED`] notification is about.
    Shadow { shadow: ShapeId, variant: Variant },
}

/// An event delivered to handlers subscribed on a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeEvent {
    pub name: String,
    /// Shape the event is being delivered on.
    pub target: ShapeId,
    /// Set when the event was first fired on a shadow.
    pub origin: Option<ShadowOrigin>,
    pub detail: EventDetail,
}

impl ShapeEvent {
    /// A plain event without payload.
    #[must_use]
    pub fn new(name: impl Into<String>, target: ShapeId) -> Self {
        Self {
            name: name.into(),
            target,
            origin: None,
            detail: EventDetail::None,
        }
    }

    /// Whether the event was re-fired from a shadow.
    #[must_use]
    pub fn from_shadow(&self) -> bool {
        self.origin.is_some()
    }

    /// The same event re-targeted at `primary`, annotated with its shadow origin.
    #[must_use]
    pub fn forwarded(&self, primary: ShapeId, shadow: ShapeId, variant: Variant) -> Self {
        Self {
            name: self.name.clone(),
            target: primary,
            origin: Some(ShadowOrigin { shadow, variant }),
            detail: self.detail,
        }
    }
}

/// What happens when a subscribed event fires.
#[derive(Clone)]
pub enum Subscription {
    Handler(Handler),
    /// Re-fire on the primary of a shadow.
    Forward { primary: ShapeId, variant: Variant },
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscription::Handler(_) => f.write_str("Handler"),
            Subscription::Forward { primary, variant } => f
                .debug_struct("Forward")
                .field("primary", primary)
                .field("variant", variant)
                .finish(),
        }
    }
}

/// Event subscriptions of one shape.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    entries: Vec<(String, Subscription)>,
}

impl Listeners {
    /// Subscribes to `name`.
    pub fn on(&mut self, name: impl Into<String>, subscription: Subscription) {
        self.entries.push((name.into(), subscription));
    }

    /// Subscriptions for `name`, in registration order.
    #[must_use]
    pub fn matching(&self, name: &str) -> Vec<Subscription> {
        self.entries
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, s)| s.clone())
            .collect()
    }

    /// Removes and returns every subscription.
    pub fn take(&mut self) -> Listeners {
        std::mem::take(self)
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

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn matching_filters_by_name() {
        let mut ids: SlotMap<ShapeId, ()> = SlotMap::with_key();
        let primary = ids.insert(());

        let mut l = Listeners::default();
        l.on("click", Subscription::Forward { primary, variant: Variant::MirrorAxis2 });
        l.on("dblclick", Subscription::Handler(Rc::new(|_: &ShapeEvent| {})));
        assert_eq!(l.matching("click").len(), 1);
        assert_eq!(l.matching("mouseout").len(), 0);

        let taken = l.take();
        assert!(l.is_empty());
        assert_eq!(taken.len(), 2);
    }

    #[test]
    fn forwarded_keeps_name_and_marks_origin() {
        let mut ids: SlotMap<ShapeId, ()> = SlotMap::with_key();
        let primary = ids.insert(());
        let shadow = ids.insert(());

        let e = ShapeEvent::new("click", shadow).forwarded(primary, shadow, Variant::MirrorAxis1);
        assert_eq!(e.target, primary);
        assert!(e.from_shadow());
        assert_eq!(e.origin.map(|o| o.shadow), Some(shadow));
    }
}
