use crate::analysis::{CrossingInfo, Variant};
use crate::shape::ShapeId;

use super::ShadowRegistry;

/// Whether a shape is a primary (owning a registry) or a shadow.
#[derive(Debug, Clone)]
pub enum Role {
    Primary(ShadowRegistry),
    /// Non-owning back-reference to the primary.
    Shadow { primary: ShapeId },
}

/// Re-entrancy flags held for the duration of one logical mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// The primary is replaying a root call onto its shadows.
    FanOut,
    /// The shadow is executing on behalf of its primary.
    ActingForPrimary,
}

/// Shadow bookkeeping of a shape that takes part in shadowing.
#[derive(Debug, Clone)]
pub struct ShadowState {
    pub(crate) role: Role,
    pub(crate) variant: Variant,
    pub(crate) fan_out: bool,
    pub(crate) acting_for_primary: bool,
    pub(crate) block_changes: bool,
    pub(crate) crossing: Option<CrossingInfo>,
}

impl ShadowState {
    /// State of a fresh primary holding the canonical representation.
    #[must_use]
    pub fn primary() -> Self {
        Self::with_role(Role::Primary(ShadowRegistry::default()), Variant::Identity)
    }

    /// State of a shadow of `primary` holding `variant`.
    #[must_use]
    pub fn shadow_of(primary: ShapeId, variant: Variant) -> Self {
        Self::with_role(Role::Shadow { primary }, variant)
    }

    fn with_role(role: Role, variant: Variant) -> Self {
        Self {
            role,
            variant,
            fan_out: false,
            acting_for_primary: false,
            block_changes: false,
            crossing: None,
        }
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Registry of a primary.
    #[must_use]
    pub fn registry(&self) -> Option<&ShadowRegistry> {
        match &self.role {
            Role::Primary(reg) => Some(reg),
            Role::Shadow { .. } => None,
        }
    }

    pub(crate) fn registry_mut(&mut self) -> Option<&mut ShadowRegistry> {
        match &mut self.role {
            Role::Primary(reg) => Some(reg),
            Role::Shadow { .. } => None,
        }
    }

    /// Crossing state cached by the last recompute.
    #[must_use]
    pub fn crossing(&self) -> Option<&CrossingInfo> {
        self.crossing.as_ref()
    }

    #[must_use]
    pub fn is_blocking_changes(&self) -> bool {
        self.block_changes
    }

    #[must_use]
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::FanOut => self.fan_out,
            Flag::ActingForPrimary => self.acting_for_primary,
        }
    }

    pub(crate) fn set_flag(&mut self, flag: Flag, value: bool) {
        match flag {
            Flag::FanOut => self.fan_out = value,
            Flag::ActingForPrimary => self.acting_for_primary = value,
        }
    }
}
