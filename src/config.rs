//! Runtime configuration of shadowing.

use crate::events::DEFAULT_FORWARDED_EVENTS;
use crate::shape::{ShapeClass, ShapeKind};

/// One blocked call site: `op` on a shadow of `class`, invoked by `caller`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Exception {
    class: ShapeClass,
    op: String,
    caller: String,
}

/// Call sites whose propagation onto shadows is suppressed.
///
/// A matching call on a shadow is treated as already handled and does nothing.
#[derive(Debug, Clone, Default)]
pub struct ExceptionTable {
    entries: Vec<Exception>,
}

impl ExceptionTable {
    /// Blocks `op` on shadows of `class` when invoked by `caller`.
    pub fn add(&mut self, class: ShapeClass, op: impl Into<String>, caller: impl Into<String>) {
        let entry = Exception {
            class,
            op: op.into(),
            caller: caller.into(),
        };
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
    }

    /// Removes a previously added exception. Returns whether one was removed.
    pub fn remove(&mut self, class: ShapeClass, op: &str, caller: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.class == class && e.op == op && e.caller == caller));
        self.entries.len() != before
    }

    /// Whether a call of `op` on a shape of `kind` from `caller` is blocked.
    ///
    /// Exceptions registered on a base class apply to every derived kind.
    #[must_use]
    pub fn blocks(&self, kind: ShapeKind, op: &str, caller: Option<&str>) -> bool {
        let Some(caller) = caller else {
            return false;
        };
        self.entries
            .iter()
            .any(|e| e.op == op && e.caller == caller && kind.is_a(e.class))
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

/// Configuration shared by every shape of a scene.
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    minimum_wrap_distance: f64,
    forwarded_events: Vec<String>,
    pub exceptions: ExceptionTable,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            minimum_wrap_distance: 0.0,
            forwarded_events: DEFAULT_FORWARDED_EVENTS.iter().map(|e| (*e).to_string()).collect(),
            exceptions: ExceptionTable::default(),
        }
    }
}

impl ShadowConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer distance around wrap boundaries, always non-negative.
    #[must_use]
    pub fn minimum_wrap_distance(&self) -> f64 {
        self.minimum_wrap_distance.abs()
    }

    pub fn set_minimum_wrap_distance(&mut self, distance: f64) {
        self.minimum_wrap_distance = distance.abs();
    }

    #[must_use]
    pub fn with_minimum_wrap_distance(mut self, distance: f64) -> Self {
        self.set_minimum_wrap_distance(distance);
        self
    }

    /// Event names re-fired on the primary when fired on a shadow.
    #[must_use]
    pub fn forwarded_events(&self) -> &[String] {
        &self.forwarded_events
    }

    /// Adds an event name to forward from shadows.
    pub fn forward_event(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.forwarded_events.contains(&name) {
            self.forwarded_events.push(name);
        }
    }

    #[must_use]
    pub fn with_forwarded_event(mut self, name: impl Into<String>) -> Self {
        self.forward_event(name);
        self
    }

    #[must_use]
    pub fn with_exception(
        mut self,
        class: ShapeClass,
        op: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        self.exceptions.add(class, op, caller);
        self
    }
}
