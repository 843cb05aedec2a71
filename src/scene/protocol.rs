use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use tracing::trace;

use crate::analysis::Variant;
use crate::dispatch::{builtin, Args, DispatchCategory, Method, Value};
use crate::error::{OperationError, Result};
use crate::shadow::{Flag, Role};
use crate::shape::{ShapeId, ShapeKind};
use crate::surface::Surface;

use super::{OpContext, Scene};

/// Decision taken on entry of a tracked operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    /// Run the implementation on the target only.
    Direct,
    /// Blocked call site on a shadow; treated as done.
    Blocked,
    /// Called on a shadow by an outside caller; rerun on the primary.
    ToPrimary(ShapeId),
    /// Root call on a primary; fan out to its shadows.
    Root,
}

/// Sets a shadow flag on a shape and restores its previous value on drop.
///
/// Holding the scene through the guard keeps the flag set for exactly as
/// long as the guarded work runs, including early returns on error.
struct FlagScope<'a, S: Surface> {
    scene: &'a mut Scene<S>,
    id: ShapeId,
    flag: Flag,
    previous: bool,
}

impl<'a, S: Surface> FlagScope<'a, S> {
    fn acquire(scene: &'a mut Scene<S>, id: ShapeId, flag: Flag) -> Self {
        let mut previous = false;
        if let Some(state) = scene.shapes.get_mut(id).and_then(|s| s.shadow.as_mut()) {
            previous = state.flag(flag);
            state.set_flag(flag, true);
        }
        Self {
            scene,
            id,
            flag,
            previous,
        }
    }
}

impl<S: Surface> Deref for FlagScope<'_, S> {
    type Target = Scene<S>;

    fn deref(&self) -> &Scene<S> {
        self.scene
    }
}

impl<S: Surface> DerefMut for FlagScope<'_, S> {
    fn deref_mut(&mut self) -> &mut Scene<S> {
        self.scene
    }
}

impl<S: Surface> Drop for FlagScope<'_, S> {
    fn drop(&mut self) {
        if let Some(state) = self
            .scene
            .shapes
            .get_mut(self.id)
            .and_then(|s| s.shadow.as_mut())
        {
            state.set_flag(self.flag, self.previous);
        }
    }
}

impl<S: Surface> Scene<S> {
    /// Invokes `op` on a shape through the shadow protocol.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape does not exist, the operation is not
    /// defined for its kind, or the operation itself fails.
    pub fn invoke(&mut self, id: ShapeId, op: &str, args: &[Value]) -> Result<Value> {
        self.dispatch(id, op, args, None)
    }

    /// Invokes `op` on behalf of `caller`, so exceptions registered for that
    /// caller apply.
    ///
    /// # Errors
    ///
    /// See [`Scene::invoke`].
    pub fn invoke_as(&mut self, id: ShapeId, op: &str, args: &[Value], caller: &str) -> Result<Value> {
        self.dispatch(id, op, args, Some(caller))
    }

    pub(crate) fn dispatch(
        &mut self,
        target: ShapeId,
        op: &str,
        args: &[Value],
        caller: Option<&str>,
    ) -> Result<Value> {
        let kind = self.shape(target)?.kind();
        let method = self
            .methods
            .get(kind, op)
            .cloned()
            .ok_or_else(|| OperationError::UnknownOperation {
                kind,
                op: op.to_string(),
            })?;

        let Some((category, _)) = method.tracked else {
            return self.run_original(&method, target, op, args);
        };
        if category == DispatchCategory::Structural {
            return self.run_original(&method, target, op, &builtin::migrate(op, args));
        }

        let route = self.route(target, kind, op, caller);
        trace!(?target, op, ?route, "dispatch");
        match route {
            Route::Direct => self.run_original(&method, target, op, args),
            Route::Blocked => Ok(Value::Shape(target)),
            Route::ToPrimary(primary) => {
                let mut scope = FlagScope::acquire(self, target, Flag::ActingForPrimary);
                scope.dispatch(primary, op, args, caller)
            }
            Route::Root => {
                let mut scope = FlagScope::acquire(self, target, Flag::FanOut);
                scope.root_call(&method, category, target, op, args)
            }
        }
    }

    fn route(&self, target: ShapeId, kind: ShapeKind, op: &str, caller: Option<&str>) -> Route {
        let Some(shape) = self.shapes.get(target).filter(|s| s.attached) else {
            return Route::Direct;
        };
        let Some(state) = shape.shadow.as_ref() else {
            return Route::Direct;
        };

        match state.role {
            Role::Shadow { primary } => {
                if self.config.exceptions.blocks(kind, op, caller) {
                    Route::Blocked
                } else if state.acting_for_primary {
                    Route::Direct
                } else {
                    Route::ToPrimary(primary)
                }
            }
            Role::Primary(_) if state.fan_out => Route::Direct,
            Role::Primary(_) => Route::Root,
        }
    }

    fn run_original(&mut self, method: &Method<S>, target: ShapeId, op: &str, args: &[Value]) -> Result<Value> {
        let original = Rc::clone(&method.original);
        let mut ctx = OpContext {
            scene: self,
            target,
            op,
        };
        original(&mut ctx, args)
    }

    /// Runs `op` on the primary, then brings every shadow along.
    fn root_call(
        &mut self,
        method: &Method<S>,
        category: DispatchCategory,
        primary: ShapeId,
        op: &str,
        args: &[Value],
    ) -> Result<Value> {
        if category == DispatchCategory::MultiVertex {
            return self.replace_vertices(method, primary, op, args);
        }

        let translate = category.translated_arg();
        let own_args = match translate {
            Some(index) => self.translate_args(primary, args, index)?,
            None => args.to_vec(),
        };
        let ret = self.run_original(method, primary, op, &own_args)?;

        if category.rechecks() {
            let vertices = self.shape(primary)?.vertices();
            let plan = self.calc_shadow(primary, &vertices)?;
            let changed = self.reconcile(primary, &plan, false)?;
            self.replay(method, primary, op, args, translate, &changed)?;
            self.sync_to_plan(primary, &plan)?;
        } else {
            self.replay(method, primary, op, args, translate, &[])?;
        }

        if translate.is_some() {
            self.fix_shape(primary)?;
        }
        Ok(ret)
    }

    /// Vertex-list replacement: the primary takes the canonical form of the
    /// raw input, then each shadow receives its own variant of the primary's
    /// resulting geometry.
    fn replace_vertices(
        &mut self,
        method: &Method<S>,
        primary: ShapeId,
        op: &str,
        args: &[Value],
    ) -> Result<Value> {
        let raw = Args::new(op, args).vertices(0)?;
        let with_vertices = |v: &crate::geometry::Vertices| {
            let mut out = args.to_vec();
            out[0] = Value::Vertices(v.clone());
            out
        };

        let canonical = self.calc_shadow(primary, raw)?;
        let own = canonical.get(Variant::Identity).unwrap_or(raw);
        let ret = self.run_original(method, primary, op, &with_vertices(own))?;

        let vertices = self.shape(primary)?.vertices();
        let plan = self.calc_shadow(primary, &vertices)?;
        let changed = self.reconcile(primary, &plan, false)?;
        for (variant, shadow) in self.shadows(primary) {
            if changed.contains(&variant) {
                continue;
            }
            if let Some(vertices) = plan.get(variant) {
                self.run_on_shadow(method, shadow, op, &with_vertices(vertices))?;
            }
        }
        Ok(ret)
    }

    /// Replays a root call onto the live shadows of `primary`, skipping
    /// the variants in `skip`.
    fn replay(
        &mut self,
        method: &Method<S>,
        primary: ShapeId,
        op: &str,
        args: &[Value],
        translate: Option<usize>,
        skip: &[Variant],
    ) -> Result<()> {
        for (variant, shadow) in self.shadows(primary) {
            if skip.contains(&variant) {
                continue;
            }
            let shadow_args = match translate {
                Some(index) => self.translate_args(shadow, args, index)?,
                None => args.to_vec(),
            };
            self.run_on_shadow(method, shadow, op, &shadow_args)?;
            if translate.is_some() {
                self.fix_shape(shadow)?;
            }
        }
        Ok(())
    }

    fn run_on_shadow(&mut self, method: &Method<S>, shadow: ShapeId, op: &str, args: &[Value]) -> Result<Value> {
        let mut scope = FlagScope::acquire(self, shadow, Flag::ActingForPrimary);
        scope.run_original(method, shadow, op, args)
    }

    /// Re-expresses the coordinate at `index` in the variant of `id`.
    fn translate_args(&mut self, id: ShapeId, args: &[Value], index: usize) -> Result<Vec<Value>> {
        let mut out = args.to_vec();
        if let Some(Value::Coord(c)) = args.get(index) {
            out[index] = Value::Coord(self.guide_coord(id, *c)?);
        }
        Ok(out)
    }
}
