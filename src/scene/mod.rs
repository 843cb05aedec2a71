//! The scene: an arena of shapes on a display surface, and the operations
//! that keep primaries and their shadows in sync.

mod api;
mod lifecycle;
mod protocol;

use std::rc::Rc;

use slotmap::SlotMap;
use tracing::debug;

use crate::analysis::Variant;
use crate::config::ShadowConfig;
use crate::dispatch::{DispatchCategory, DispatchTable, MethodTable, Originals, Value};
use crate::error::{Result, ShapeError};
use crate::events::{ShapeEvent, Subscription};
use crate::shadow::ShadowRegistry;
use crate::shape::{Shape, ShapeClass, ShapeId};
use crate::surface::Surface;

/// Shapes drawn on one surface, with their shadows.
///
/// Every shape, primary or shadow, lives in the scene's arena and is
/// addressed by its [`ShapeId`].
pub struct Scene<S: Surface> {
    shapes: SlotMap<ShapeId, Shape>,
    surface: S,
    config: ShadowConfig,
    methods: MethodTable<S>,
}

impl<S: Surface> std::fmt::Debug for Scene<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("shapes", &self.shapes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Assembles the operation table of a scene before it is built.
pub struct SceneBuilder<S: Surface> {
    surface: S,
    config: ShadowConfig,
    table: DispatchTable,
    originals: Originals<S>,
}

impl<S: Surface> SceneBuilder<S> {
    /// A builder with the standard operations.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            config: ShadowConfig::default(),
            table: DispatchTable::standard(),
            originals: Originals::standard(),
        }
    }

    #[must_use]
    pub fn config(mut self, config: ShadowConfig) -> Self {
        self.config = config;
        self
    }

    /// Tracks `op` on `class` with `category`.
    #[must_use]
    pub fn define(mut self, class: ShapeClass, op: &str, category: DispatchCategory) -> Self {
        self.table.define(class, op, category);
        self
    }

    /// Registers the implementation of `op` on `class`.
    #[must_use]
    pub fn register<F>(mut self, class: ShapeClass, op: &str, f: F) -> Self
    where
        F: Fn(&mut OpContext<'_, S>, &[Value]) -> Result<Value> + 'static,
    {
        self.originals.register(class, op, f);
        self
    }

    /// Forwards `name` from shadows to their primary.
    #[must_use]
    pub fn forward_event(mut self, name: &str) -> Self {
        self.config.forward_event(name);
        self
    }

    /// Resolves every operation and creates the scene.
    #[must_use]
    pub fn build(self) -> Scene<S> {
        Scene {
            shapes: SlotMap::with_key(),
            surface: self.surface,
            config: self.config,
            methods: MethodTable::install(&self.table, &self.originals),
        }
    }
}

impl<S: Surface> Scene<S> {
    /// A scene with the standard operations and default configuration.
    #[must_use]
    pub fn new(surface: S) -> Self {
        SceneBuilder::new(surface).build()
    }

    #[must_use]
    pub fn builder(surface: S) -> SceneBuilder<S> {
        SceneBuilder::new(surface)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ShadowConfig {
        &mut self.config
    }

    /// Number of shapes, shadows and cached shadows included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Adds a detached shape and returns its ID.
    ///
    /// Shapes not opted out of shadowing get their shadow bookkeeping here;
    /// shadows are created once the shape is attached.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        if !shape.no_shadow {
            shape.shadow = Some(crate::shadow::ShadowState::primary());
        }
        self.shapes.insert(shape)
    }

    /// Returns the shape, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn shape(&self, id: ShapeId) -> Result<&Shape> {
        Ok(self.shapes.get(id).ok_or(ShapeError::NotFound(id))?)
    }

    pub(crate) fn shape_mut(&mut self, id: ShapeId) -> Result<&mut Shape> {
        Ok(self.shapes.get_mut(id).ok_or(ShapeError::NotFound(id))?)
    }

    /// Registry of a primary; `None` for shadows and opted-out shapes.
    #[must_use]
    pub fn registry(&self, id: ShapeId) -> Option<&ShadowRegistry> {
        self.shapes
            .get(id)
            .and_then(Shape::shadow_state)
            .and_then(|state| state.registry())
    }

    /// Live shadows of a primary, in variant order.
    #[must_use]
    pub fn shadows(&self, id: ShapeId) -> Vec<(Variant, ShapeId)> {
        self.registry(id)
            .map(ShadowRegistry::shadows)
            .unwrap_or_default()
    }

    /// Live shadow of `id` holding `variant`.
    #[must_use]
    pub fn shadow(&self, id: ShapeId, variant: Variant) -> Option<ShapeId> {
        self.registry(id).and_then(|r| r.get(variant))
    }

    /// The shape itself if it is a primary, otherwise its primary.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn primary_of(&self, id: ShapeId) -> Result<ShapeId> {
        Ok(self.shape(id)?.primary().unwrap_or(id))
    }

    /// Whether the root call of a primary is being replayed onto its shadows.
    #[must_use]
    pub fn fan_out_in_progress(&self, id: ShapeId) -> bool {
        self.shapes
            .get(id)
            .and_then(Shape::shadow_state)
            .is_some_and(|state| state.fan_out)
    }

    /// Puts a shape on the surface; a primary gets its shadows.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene or is a shadow.
    pub fn attach(&mut self, id: ShapeId) -> Result<()> {
        self.ensure_not_shadow(id)?;
        let shape = self.shapes.get_mut(id).ok_or(ShapeError::NotFound(id))?;
        if shape.attached {
            return Ok(());
        }
        shape.attached = true;
        self.surface.add_shape(id, shape);
        self.add_shadows(id, false)
    }

    /// Takes a shape off the surface; a primary's shadows go to its cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene or is a shadow.
    pub fn detach(&mut self, id: ShapeId) -> Result<()> {
        self.ensure_not_shadow(id)?;
        if !self.shape(id)?.attached {
            return Ok(());
        }
        self.remove_all_shadows(id)?;
        self.shape_mut(id)?.attached = false;
        self.surface.remove_shape(id);
        Ok(())
    }

    /// Detaches and drops a primary together with its cached shadows.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene or is a shadow.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape> {
        self.detach(id)?;
        let mut shape = self.shapes.remove(id).ok_or(ShapeError::NotFound(id))?;
        for cached in shape.cache.drain() {
            self.shapes.remove(cached.shape);
        }
        debug!(?id, "removed shape");
        Ok(shape)
    }

    /// Shadows live and die with their primary.
    fn ensure_not_shadow(&self, id: ShapeId) -> Result<()> {
        if self.shape(id)?.is_shadow() {
            return Err(ShapeError::ShadowManaged(id).into());
        }
        Ok(())
    }

    /// Subscribes `handler` to `name` on a shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn on<F>(&mut self, id: ShapeId, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&ShapeEvent) + 'static,
    {
        self.shape_mut(id)?
            .listeners
            .on(name, Subscription::Handler(Rc::new(handler)));
        Ok(())
    }

    /// Fires `name` on a shape; shadows forward configured events to their primary.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn fire(&self, id: ShapeId, name: &str) -> Result<()> {
        self.deliver(&ShapeEvent::new(name, id))
    }

    pub(crate) fn deliver(&self, event: &ShapeEvent) -> Result<()> {
        let subscriptions = self.shape(event.target)?.listeners.matching(&event.name);
        for subscription in subscriptions {
            match subscription {
                Subscription::Handler(handler) => handler(event),
                Subscription::Forward { primary, variant } => {
                    self.deliver(&event.forwarded(primary, event.target, variant))?;
                }
            }
        }
        Ok(())
    }
}

/// Access given to an operation implementation while it runs on one shape.
pub struct OpContext<'a, S: Surface> {
    scene: &'a mut Scene<S>,
    target: ShapeId,
    op: &'a str,
}

impl<'a, S: Surface> OpContext<'a, S> {
    /// Shape the operation runs on.
    #[must_use]
    pub fn target(&self) -> ShapeId {
        self.target
    }

    /// Name of the running operation.
    #[must_use]
    pub fn op(&self) -> &'a str {
        self.op
    }

    /// The conventional result of an operation: the shape it ran on.
    #[must_use]
    pub fn this(&self) -> Value {
        Value::Shape(self.target)
    }

    /// # Errors
    ///
    /// Returns an error if the shape was removed from the scene.
    pub fn shape(&self) -> Result<&Shape> {
        self.scene.shape(self.target)
    }

    /// # Errors
    ///
    /// Returns an error if the shape was removed from the scene.
    pub fn shape_mut(&mut self) -> Result<&mut Shape> {
        self.scene.shape_mut(self.target)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.scene.surface
    }

    /// Invokes another operation on the same shape, through the protocol.
    ///
    /// # Errors
    ///
    /// Propagates errors of the invoked operation.
    pub fn invoke(&mut self, op: &str, args: &[Value]) -> Result<Value> {
        self.scene.dispatch(self.target, op, args, Some(self.op))
    }

    /// Redraws the shape if it is on the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape was removed from the scene.
    pub fn redraw(&mut self) -> Result<()> {
        self.scene.fix_shape(self.target)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::dispatch::Args;
    use crate::math::coord;
    use crate::surface::HeadlessSurface;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn antimeridian_line() -> Shape {
        Shape::polyline(vec![coord(10.0, 170.0), coord(10.0, -170.0)])
    }

    #[test]
    fn extension_operations_are_propagated() {
        init_tracing();
        let mut scene = Scene::builder(HeadlessSurface::world())
            .define(ShapeClass::Polyline, "set_text", DispatchCategory::Simple)
            .register(ShapeClass::Polyline, "set_text", |ctx, args| {
                let text = Args::new(ctx.op(), args).text(0)?.to_string();
                ctx.shape_mut()?.tooltip = Some(crate::shape::Overlay::new(text));
                Ok(ctx.this())
            })
            .forward_event("keypress")
            .build();

        let line = scene.insert(antimeridian_line());
        scene.attach(line).unwrap();
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        scene.invoke(line, "set_text", &[Value::from("along")]).unwrap();
        let text = scene.shape(shadow).unwrap().tooltip.clone().map(|t| t.content);
        assert_eq!(text.as_deref(), Some("along"));

        let seen = Rc::new(RefCell::new(0));
        let count = Rc::clone(&seen);
        scene.on(line, "keypress", move |_| *count.borrow_mut() += 1).unwrap();
        scene.fire(shadow, "keypress").unwrap();
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn attach_and_detach_round_trip() {
        init_tracing();
        let mut scene = Scene::new(HeadlessSurface::world());
        let line = scene.insert(antimeridian_line());
        assert!(scene.shadows(line).is_empty());

        scene.attach(line).unwrap();
        assert!(scene.shape(line).unwrap().is_attached());
        assert_eq!(scene.surface().len(), 2);

        scene.detach(line).unwrap();
        assert!(!scene.shape(line).unwrap().is_attached());
        assert!(scene.surface().is_empty());

        scene.attach(line).unwrap();
        assert_eq!(scene.shadows(line).len(), 1);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn shadows_cannot_be_attached_detached_or_removed() {
        let mut scene = Scene::new(HeadlessSurface::world());
        let line = scene.insert(antimeridian_line());
        scene.attach(line).unwrap();
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        for result in [scene.detach(shadow), scene.attach(shadow)] {
            assert!(matches!(
                result,
                Err(crate::error::ShadowWrapError::Shape(ShapeError::ShadowManaged(id))) if id == shadow
            ));
        }
        assert!(scene.remove(shadow).is_err());
        assert_eq!(scene.len(), 2);
        assert!(scene.shape(shadow).unwrap().is_attached());
        assert!(scene.surface().contains(shadow));

        scene
            .set_lat_lngs(shadow, vec![coord(0.0, 0.0), coord(0.0, 5.0)])
            .unwrap();
        assert!(scene.shadows(line).is_empty());
        assert_eq!(
            scene.shape(line).unwrap().vertices(),
            crate::geometry::Vertices::from(vec![coord(0.0, 0.0), coord(0.0, 5.0)])
        );
        assert!(!scene.shape(shadow).unwrap().is_attached());
    }

    #[test]
    fn missing_shape_is_an_error() {
        let mut scene = Scene::new(HeadlessSurface::world());
        let line = scene.insert(antimeridian_line());
        scene.remove(line).unwrap();
        assert!(matches!(
            scene.shape(line),
            Err(crate::error::ShadowWrapError::Shape(ShapeError::NotFound(_)))
        ));
        assert!(scene.attach(line).is_err());
    }
}
