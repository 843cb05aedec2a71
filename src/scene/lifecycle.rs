use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::analysis::{detect_point, detect_vertices, AxisCrossing, CrossingInfo, ShadowPlan, Variant};
use crate::dispatch::{ops, Value};
use crate::error::{Result, ShapeError};
use crate::events::{EventDetail, ShapeEvent, Subscription, SHADOW_ADDED, SHADOW_REMOVED};
use crate::geometry::Vertices;
use crate::math::{Axis, Coord};
use crate::shadow::{CachedShadow, ShadowState};
use crate::shape::{Shape, ShapeId, ShapeKind};
use crate::surface::Surface;

use super::Scene;

impl<S: Surface> Scene<S> {
    /// Computes the crossing state and every needed variant of `vertices`
    /// for a primary, caching the crossing state on it.
    ///
    /// Detached and opted-out shapes get a plan holding `vertices` unchanged
    /// in their own variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn calc_shadow(&mut self, id: ShapeId, vertices: &Vertices) -> Result<ShadowPlan> {
        let shape = self.shape(id)?;
        let Some(state) = shape.shadow.as_ref().filter(|_| shape.attached) else {
            let own = shape.variant().unwrap_or(Variant::Identity);
            return Ok(ShadowPlan::passthrough(own, vertices.clone()));
        };

        let bounds = self.surface.wrap_bounds();
        let min_distance = self.config.minimum_wrap_distance();
        let mut crossing = if shape.kind().is_multi_vertex() {
            detect_vertices(vertices, &bounds, min_distance)
        } else {
            let center = vertices.first().or_else(|| shape.position()).unwrap_or_else(Coord::origin);
            detect_point(center, self.radius_units(shape), &bounds, min_distance)
        };

        if state.block_changes {
            let registry = state.registry();
            let has = |v| registry.is_some_and(|r| r.contains(v));
            crossing = AxisCrossing {
                axis1: has(Variant::MirrorAxis1),
                axis2: has(Variant::MirrorAxis2),
            };
        }

        let wrapped = vertices.map(&|c| self.surface.wrap_coord(c));
        let info = CrossingInfo::new(crossing, &wrapped, &bounds);
        let plan = info.plan(&wrapped);
        debug!(?id, axis1 = info.crossing.axis1, axis2 = info.crossing.axis2, "crossing recomputed");

        if let Some(state) = self.shape_mut(id)?.shadow.as_mut() {
            state.crossing = Some(info);
        }
        Ok(plan)
    }

    /// Extent of a point shape in coordinate units.
    fn radius_units(&self, shape: &Shape) -> f64 {
        match shape.kind() {
            ShapeKind::CircleMarker => self.surface.pixels_to_units(shape.radius()).abs(),
            ShapeKind::Circle => match self.surface.earth_radius() {
                Some(r) => shape.radius() * (180.0 / PI / r),
                None => shape.radius(),
            },
            _ => 0.0,
        }
    }

    /// Creates and removes shadows of a primary so that exactly the variants
    /// `plan` needs exist. Returns the variants that changed.
    ///
    /// Does nothing while shadow changes are blocked.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn reconcile(&mut self, primary: ShapeId, plan: &ShadowPlan, restore: bool) -> Result<Vec<Variant>> {
        let shape = self.shape(primary)?;
        let Some(state) = shape.shadow.as_ref() else {
            return Ok(Vec::new());
        };
        if state.block_changes {
            return Ok(Vec::new());
        }
        let Some(registry) = state.registry() else {
            return Ok(Vec::new());
        };

        let own = state.variant;
        let mut added = Vec::new();
        let mut removed = Vec::new();
        for variant in Variant::ALL.into_iter().filter(|v| *v != own) {
            match (plan.get(variant), registry.contains(variant)) {
                (Some(vertices), false) => added.push((variant, vertices.clone())),
                (None, true) => removed.push(variant),
                _ => {}
            }
        }

        let mut changed = Vec::with_capacity(added.len() + removed.len());
        for (variant, vertices) in added {
            self.add_shadow(primary, variant, &vertices, restore)?;
            changed.push(variant);
        }
        for variant in removed {
            self.remove_shadow(primary, variant)?;
            changed.push(variant);
        }
        if !changed.is_empty() {
            debug!(?primary, ?changed, "shadows reconciled");
        }
        Ok(changed)
    }

    /// Normalizes an attached primary into its canonical representation and
    /// creates the shadows it needs.
    pub(crate) fn add_shadows(&mut self, primary: ShapeId, restore: bool) -> Result<()> {
        let shape = self.shape(primary)?;
        if shape.is_shadow() || shape.shadow.is_none() {
            return Ok(());
        }

        let vertices = shape.vertices();
        let plan = self.calc_shadow(primary, &vertices)?;
        if let Some(own) = plan.get(Variant::Identity) {
            self.shape_mut(primary)?.assign_vertices(own);
        }
        self.reconcile(primary, &plan, restore)?;
        self.fix_shape(primary)
    }

    fn add_shadow(&mut self, primary: ShapeId, variant: Variant, vertices: &Vertices, restore: bool) -> Result<()> {
        let cached = if restore {
            self.shape_mut(primary)?.cache.take(variant)
        } else {
            None
        };

        let shadow = if let Some(CachedShadow { shape, listeners }) = cached {
            let [restored, source] = self
                .shapes
                .get_disjoint_mut([shape, primary])
                .ok_or(ShapeError::NotFound(shape))?;
            restored.copy_appearance(source);
            restored.listeners = listeners;
            restored.assign_vertices(vertices);
            debug!(?primary, ?variant, shadow = ?shape, "shadow restored");
            shape
        } else {
            if let Some(evicted) = self.shape_mut(primary)?.cache.take(variant) {
                self.shapes.remove(evicted.shape);
            }
            let mut copy = self.shape(primary)?.shadow_copy(vertices);
            copy.shadow = Some(ShadowState::shadow_of(primary, variant));
            for name in self.config.forwarded_events() {
                copy.listeners
                    .on(name.as_str(), Subscription::Forward { primary, variant });
            }
            let shadow = self.shapes.insert(copy);
            debug!(?primary, ?variant, ?shadow, "shadow created");
            shadow
        };

        let block_changes = self
            .shape(primary)?
            .shadow_state()
            .is_some_and(ShadowState::is_blocking_changes);
        if let Some(state) = self.shape_mut(shadow)?.shadow.as_mut() {
            state.block_changes = block_changes;
        }
        if let Some(registry) = self
            .shape_mut(primary)?
            .shadow
            .as_mut()
            .and_then(ShadowState::registry_mut)
        {
            registry.insert(variant, shadow);
        }

        let shape = self.shapes.get_mut(shadow).ok_or(ShapeError::NotFound(shadow))?;
        shape.attached = true;
        self.surface.add_shape(shadow, shape);
        self.fix_shape(shadow)?;

        self.deliver(&ShapeEvent {
            detail: EventDetail::Shadow { shadow, variant },
            ..ShapeEvent::new(SHADOW_ADDED, primary)
        })
    }

    /// Detaches a shadow into the removal cache of its primary.
    fn remove_shadow(&mut self, primary: ShapeId, variant: Variant) -> Result<()> {
        let Some(shadow) = self
            .shape_mut(primary)?
            .shadow
            .as_mut()
            .and_then(ShadowState::registry_mut)
            .and_then(|r| r.remove(variant))
        else {
            return Ok(());
        };

        let shape = self.shape_mut(shadow)?;
        let listeners = shape.listeners.take();
        shape.attached = false;
        if !self.surface.remove_shape(shadow) {
            warn!(?primary, ?shadow, ?variant, "surface was not drawing the removed shadow");
        }

        let displaced = self
            .shape_mut(primary)?
            .cache
            .insert(variant, CachedShadow { shape: shadow, listeners });
        if let Some(displaced) = displaced.filter(|d| d.shape != shadow) {
            self.shapes.remove(displaced.shape);
        }
        debug!(?primary, ?variant, ?shadow, "shadow removed");

        self.deliver(&ShapeEvent {
            detail: EventDetail::Shadow { shadow, variant },
            ..ShapeEvent::new(SHADOW_REMOVED, primary)
        })
    }

    /// Detaches every shadow of a primary into its removal cache.
    pub(crate) fn remove_all_shadows(&mut self, primary: ShapeId) -> Result<()> {
        for (variant, _) in self.shadows(primary) {
            self.remove_shadow(primary, variant)?;
        }
        Ok(())
    }

    /// Permanently stops shadowing a shape; called on a shadow, its primary
    /// is unshadowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn unshadow(&mut self, id: ShapeId) -> Result<()> {
        let shape = self.shape(id)?;
        if shape.no_shadow {
            return Ok(());
        }
        if let Some(primary) = shape.primary() {
            return self.unshadow(primary);
        }

        self.remove_all_shadows(id)?;
        let shape = self.shape_mut(id)?;
        shape.shadow = None;
        shape.no_shadow = true;
        debug!(?id, "unshadowed");
        Ok(())
    }

    /// Resumes shadowing a shape, restoring cached shadows where possible.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn reshadow(&mut self, id: ShapeId) -> Result<()> {
        let id = self.primary_of(id)?;
        self.unshadow(id)?;

        let shape = self.shape_mut(id)?;
        shape.no_shadow = false;
        shape.shadow = Some(ShadowState::primary());
        if shape.attached {
            self.add_shadows(id, true)?;
        }
        debug!(?id, "reshadowed");
        Ok(())
    }

    /// Freezes the shadow set of a shape's primary, e.g. during a drag.
    ///
    /// While frozen, crossing is inferred from the shadows that exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn block_shadow_changes(&mut self, id: ShapeId) -> Result<()> {
        self.set_block_changes(id, true).map(|_| ())
    }

    /// Lifts a freeze, re-guides the shape into canonical form and rechecks
    /// its shadows.
    ///
    /// Called on a shadow, that shadow's geometry becomes the new geometry of
    /// the primary.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene, or propagates
    /// errors of the geometry update.
    pub fn unblock_shadow_changes(&mut self, id: ShapeId) -> Result<()> {
        let Some(primary) = self.set_block_changes(id, false)? else {
            return Ok(());
        };

        let source = self.shape(id)?;
        let vertices = source.vertices();
        if source.kind().is_multi_vertex() {
            let guided = self.guide_vertices(primary, &vertices)?;
            self.dispatch(primary, ops::SET_LAT_LNGS, &[Value::Vertices(guided)], None)?;
        } else if let Some(position) = vertices.first() {
            let guided = self.guide_coord(primary, position)?;
            self.dispatch(primary, ops::SET_LAT_LNG, &[Value::Coord(guided)], None)?;
        }

        for (_, shadow) in self.shadows(primary) {
            self.fix_shape(shadow)?;
        }
        self.fix_shape(primary)
    }

    fn set_block_changes(&mut self, id: ShapeId, block: bool) -> Result<Option<ShapeId>> {
        if self.shape(id)?.no_shadow {
            return Ok(None);
        }
        let primary = self.primary_of(id)?;
        let shadows = self.shadows(primary);
        for shape in std::iter::once(primary).chain(shadows.into_iter().map(|(_, s)| s)) {
            if let Some(state) = self.shape_mut(shape)?.shadow.as_mut() {
                state.block_changes = block;
            }
        }
        Ok(Some(primary))
    }

    /// Expresses a raw coordinate in the variant a shape holds, using its
    /// primary's last crossing state.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn guide_coord(&mut self, id: ShapeId, raw: Coord) -> Result<Coord> {
        let Some(variant) = self.shape(id)?.variant() else {
            return Ok(raw);
        };
        let primary = self.primary_of(id)?;
        if self.crossing(primary).is_none() {
            let vertices = self.shape(primary)?.vertices();
            self.calc_shadow(primary, &vertices)?;
        }
        Ok(match self.crossing(primary) {
            Some(info) => info.to_variant(variant, self.surface.wrap_coord(raw)),
            None => raw,
        })
    }

    /// Expresses raw vertices in the variant a shape holds, after
    /// recomputing its primary's crossing state from the shape's geometry.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape is not in the scene.
    pub fn guide_vertices(&mut self, id: ShapeId, raw: &Vertices) -> Result<Vertices> {
        let shape = self.shape(id)?;
        let Some(variant) = shape.variant() else {
            return Ok(raw.clone());
        };
        let own = shape.vertices();
        let primary = self.primary_of(id)?;
        self.calc_shadow(primary, &own)?;

        let Some(info) = self.crossing(primary) else {
            return Ok(raw.clone());
        };
        Ok(raw.map(&|c| info.to_variant(variant, self.surface.wrap_coord(c))))
    }

    fn crossing(&self, primary: ShapeId) -> Option<&CrossingInfo> {
        self.shapes
            .get(primary)
            .and_then(Shape::shadow_state)
            .and_then(ShadowState::crossing)
    }

    /// Resets the geometry of a primary and its shadows to `plan`.
    pub(crate) fn sync_to_plan(&mut self, primary: ShapeId, plan: &ShadowPlan) -> Result<()> {
        let shapes = std::iter::once((Variant::Identity, primary)).chain(self.shadows(primary));
        for (variant, id) in shapes.collect::<Vec<_>>() {
            let Some(vertices) = plan.get(variant) else {
                continue;
            };
            let shape = self.shape_mut(id)?;
            if shape.vertices() != *vertices {
                shape.assign_vertices(vertices);
                self.fix_shape(id)?;
            }
        }
        Ok(())
    }

    /// Redraws a shape if it is on the surface.
    pub(crate) fn fix_shape(&mut self, id: ShapeId) -> Result<()> {
        let shape = self.shapes.get(id).ok_or(ShapeError::NotFound(id))?;
        if shape.attached {
            self.surface.redraw(id, shape);
        }
        Ok(())
    }

    /// Whether a shadow-carrying shape crosses `axis`, per its primary's last
    /// recompute.
    #[must_use]
    pub fn crosses(&self, id: ShapeId, axis: Axis) -> bool {
        let primary = self.shapes.get(id).and_then(Shape::primary).unwrap_or(id);
        self.crossing(primary).is_some_and(|info| info.crossing.on(axis))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::ShadowConfig;
    use crate::events::ShadowOrigin;
    use crate::geometry::Bounds;
    use crate::math::coord;
    use crate::scene::SceneBuilder;
    use crate::surface::HeadlessSurface;
    use approx::assert_relative_eq;

    fn world() -> Scene<HeadlessSurface> {
        Scene::new(HeadlessSurface::world())
    }

    fn attached(scene: &mut Scene<HeadlessSurface>, shape: Shape) -> ShapeId {
        let id = scene.insert(shape);
        scene.attach(id).unwrap();
        id
    }

    fn flat(axis2: &[f64], axis1: f64) -> Vertices {
        Vertices::Flat(axis2.iter().map(|&v| coord(axis1, v)).collect())
    }

    fn vertices(scene: &Scene<HeadlessSurface>, id: ShapeId) -> Vertices {
        scene.shape(id).unwrap().vertices()
    }

    #[test]
    fn antimeridian_line_gets_one_mirrored_shadow() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));

        assert!(scene.crosses(line, Axis::Second));
        assert!(!scene.crosses(line, Axis::First));

        let shadows = scene.shadows(line);
        assert_eq!(shadows.len(), 1);
        let (variant, shadow) = shadows[0];
        assert_eq!(variant, Variant::MirrorAxis2);

        assert_eq!(vertices(&scene, line), flat(&[170.0, 190.0], 10.0));
        assert_eq!(vertices(&scene, shadow), flat(&[-190.0, -170.0], 10.0));
        assert!(scene.surface().contains(shadow));
        assert_eq!(scene.shape(shadow).unwrap().primary(), Some(line));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[0.0, 10.0], 0.0)));
        assert!(scene.shadows(line).is_empty());

        let plan = scene.calc_shadow(line, &flat(&[170.0, -170.0], 10.0)).unwrap();
        let first = scene.reconcile(line, &plan, false).unwrap();
        assert_eq!(first, vec![Variant::MirrorAxis2]);
        let second = scene.reconcile(line, &plan, false).unwrap();
        assert!(second.is_empty());
        assert_eq!(scene.shadows(line).len(), 1);
    }

    #[test]
    fn moving_a_circle_creates_and_caches_a_shadow() {
        let mut scene = world();
        let circle = attached(&mut scene, Shape::circle(coord(0.0, 0.0), 1_000_000.0));
        assert!(scene.shadows(circle).is_empty());

        scene.set_lat_lng(circle, coord(0.0, 175.0)).unwrap();
        let shadow = scene.shadow(circle, Variant::MirrorAxis2).unwrap();
        assert_eq!(scene.shape(shadow).unwrap().position(), Some(coord(0.0, -185.0)));
        assert_eq!(scene.shape(circle).unwrap().position(), Some(coord(0.0, 175.0)));

        scene.set_lat_lng(circle, coord(0.0, 0.0)).unwrap();
        assert!(scene.shadows(circle).is_empty());
        assert!(!scene.surface().contains(shadow));
        let cached = scene.shape(circle).unwrap().removal_cache().get(Variant::MirrorAxis2);
        assert_eq!(cached.map(|c| c.shape), Some(shadow));

        scene.set_lat_lng(circle, coord(0.0, 175.0)).unwrap();
        assert!(scene.shape(shadow).is_err());
        assert!(scene.shape(circle).unwrap().removal_cache().is_empty());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn radius_change_rechecks_crossing() {
        let mut scene = world();
        let circle = attached(&mut scene, Shape::circle(coord(0.0, 170.0), 100_000.0));
        assert!(scene.shadows(circle).is_empty());

        scene.set_radius(circle, 2_000_000.0).unwrap();
        let shadow = scene.shadow(circle, Variant::MirrorAxis2).unwrap();
        assert_relative_eq!(scene.shape(shadow).unwrap().radius(), 2_000_000.0);
    }

    #[test]
    fn circle_marker_radius_is_in_pixels() {
        let mut scene = world();
        let marker = attached(&mut scene, Shape::circle_marker(coord(0.0, 170.0), 10.0));
        assert_eq!(scene.shadows(marker).len(), 1);

        let small = attached(&mut scene, Shape::circle_marker(coord(0.0, 170.0), 5.0));
        assert!(scene.shadows(small).is_empty());
    }

    #[test]
    fn markers_cross_within_the_buffer_distance() {
        let config = ShadowConfig::new().with_minimum_wrap_distance(1.0);
        let mut scene = SceneBuilder::new(HeadlessSurface::world()).config(config).build();
        let marker = attached(&mut scene, Shape::marker(coord(0.0, 179.5)));
        let shadow = scene.shadow(marker, Variant::MirrorAxis2).unwrap();
        let position = scene.shape(shadow).unwrap().position().unwrap();
        assert_relative_eq!(position.y, -180.5);

        let far = attached(&mut scene, Shape::marker(coord(0.0, 170.0)));
        assert!(scene.shadows(far).is_empty());
    }

    #[test]
    fn appended_vertex_resyncs_every_shape() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        scene.add_lat_lng(line, coord(10.0, -100.0)).unwrap();

        assert_eq!(vertices(&scene, line), flat(&[-190.0, -170.0, -100.0], 10.0));
        assert_eq!(vertices(&scene, shadow), flat(&[170.0, 190.0, 260.0], 10.0));
    }

    #[test]
    fn converting_vertices_leaves_the_shape_alone() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[0.0, 10.0], 0.0)));

        let raw = Value::Vertices(flat(&[170.0, -170.0], 10.0));
        let converted = scene.invoke(line, ops::CONVERT_LAT_LNGS, &[raw.clone()]).unwrap();
        assert_eq!(converted, raw);
        assert!(scene.shadows(line).is_empty());
        assert!(!scene.crosses(line, Axis::Second));
        assert_eq!(vertices(&scene, line), flat(&[0.0, 10.0], 0.0));
    }

    #[test]
    fn replacing_vertices_reconciles_shadows() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[0.0, 10.0], 0.0)));

        scene.set_lat_lngs(line, flat(&[170.0, -170.0], 10.0)).unwrap();
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();
        assert_eq!(vertices(&scene, line), flat(&[170.0, 190.0], 10.0));
        assert_eq!(vertices(&scene, shadow), flat(&[-190.0, -170.0], 10.0));

        scene.set_lat_lngs(line, flat(&[0.0, 10.0], 0.0)).unwrap();
        assert!(scene.shadows(line).is_empty());
        assert_eq!(vertices(&scene, line), flat(&[0.0, 10.0], 0.0));
    }

    #[test]
    fn polygon_shadows_drop_the_closing_vertex() {
        let mut scene = world();
        let ring = |v: &[(f64, f64)]| Vertices::Flat(v.iter().map(|&(a, b)| coord(a, b)).collect());
        let polygon = attached(
            &mut scene,
            Shape::polygon(ring(&[(0.0, 170.0), (10.0, 170.0), (10.0, -170.0), (0.0, -170.0)])),
        );
        let shadow = scene.shadow(polygon, Variant::MirrorAxis2).unwrap();

        scene
            .set_lat_lngs(
                polygon,
                ring(&[
                    (0.0, 160.0),
                    (10.0, 160.0),
                    (10.0, -160.0),
                    (0.0, -160.0),
                    (0.0, 160.0),
                ]),
            )
            .unwrap();

        assert_eq!(
            vertices(&scene, polygon),
            ring(&[(0.0, 160.0), (10.0, 160.0), (10.0, 200.0), (0.0, 200.0)])
        );
        assert_eq!(
            vertices(&scene, shadow),
            ring(&[(0.0, -200.0), (10.0, -200.0), (10.0, -160.0), (0.0, -160.0)])
        );
    }

    #[test]
    fn rectangle_bounds_can_cross() {
        let mut scene = world();
        let rect = attached(
            &mut scene,
            Shape::rectangle(Bounds::new(coord(0.0, 0.0), coord(10.0, 10.0))),
        );
        assert!(scene.shadows(rect).is_empty());

        scene
            .set_bounds(rect, Bounds::new(coord(-10.0, 170.0), coord(10.0, 190.0)))
            .unwrap();
        let shadow = scene.shadow(rect, Variant::MirrorAxis2).unwrap();
        let axis2 = |id| -> Vec<f64> { vertices(&scene, id).coords().iter().map(|c| c.y).collect() };
        assert_eq!(axis2(rect), vec![170.0, 170.0, 190.0, 190.0]);
        assert_eq!(axis2(shadow), vec![-190.0, -190.0, -170.0, -170.0]);
    }

    #[test]
    fn unshadow_and_reshadow_restore_from_cache() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        scene.unshadow(shadow).unwrap();
        let shape = scene.shape(line).unwrap();
        assert!(shape.is_unshadowed());
        assert!(shape.shadow_state().is_none());
        assert!(scene.shadows(line).is_empty());
        assert!(!scene.surface().contains(shadow));
        assert_eq!(scene.shape(shadow).unwrap().listener_count(), 0);

        scene.set_style(line, crate::geometry::Style::new().with("color", "blue")).unwrap();
        assert_eq!(scene.shape(shadow).unwrap().style.get("color"), None);

        scene.reshadow(line).unwrap();
        assert_eq!(scene.shadow(line, Variant::MirrorAxis2), Some(shadow));
        assert!(scene.surface().contains(shadow));
        assert_eq!(scene.shape(shadow).unwrap().listener_count(), 6);
        assert!(!scene.shape(line).unwrap().is_unshadowed());
        assert_eq!(scene.shape(shadow).unwrap().style.get("color"), Some("blue"));
    }

    #[test]
    fn blocked_changes_keep_the_shadow_set() {
        let mut scene = world();
        let circle = attached(&mut scene, Shape::circle(coord(0.0, 175.0), 1_000_000.0));
        let shadow = scene.shadow(circle, Variant::MirrorAxis2).unwrap();

        scene.block_shadow_changes(shadow).unwrap();
        assert!(scene
            .shape(circle)
            .unwrap()
            .shadow_state()
            .is_some_and(ShadowState::is_blocking_changes));

        scene.set_lat_lng(circle, coord(0.0, 0.0)).unwrap();
        assert_eq!(scene.shadow(circle, Variant::MirrorAxis2), Some(shadow));

        scene.unblock_shadow_changes(circle).unwrap();
        assert!(scene.shadows(circle).is_empty());
        assert_eq!(scene.shape(circle).unwrap().position(), Some(coord(0.0, 0.0)));
    }

    #[test]
    fn guides_raw_coordinates_into_each_variant() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        assert_eq!(scene.guide_coord(line, coord(0.0, -175.0)).unwrap(), coord(0.0, 185.0));
        assert_eq!(scene.guide_coord(shadow, coord(0.0, -175.0)).unwrap(), coord(0.0, -175.0));

        let raw = flat(&[175.0, -175.0], 0.0);
        assert_eq!(scene.guide_vertices(line, &raw).unwrap(), flat(&[175.0, 185.0], 0.0));
        assert_eq!(scene.guide_vertices(shadow, &raw).unwrap(), flat(&[-185.0, -175.0], 0.0));

        let plain = scene.insert(Shape::marker(coord(0.0, 0.0)).without_shadow());
        assert_eq!(scene.guide_coord(plain, coord(0.0, 200.0)).unwrap(), coord(0.0, 200.0));
    }

    #[test]
    fn lifecycle_notifications_reach_the_primary() {
        let mut scene = world();
        let line = scene.insert(Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let seen: Rc<RefCell<Vec<ShapeEvent>>> = Rc::default();
        for name in [SHADOW_ADDED, SHADOW_REMOVED] {
            let log = Rc::clone(&seen);
            scene.on(line, name, move |e| log.borrow_mut().push(e.clone())).unwrap();
        }

        scene.attach(line).unwrap();
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();
        scene.detach(line).unwrap();

        let events = seen.borrow();
        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec![SHADOW_ADDED, SHADOW_REMOVED]);
        let detail = EventDetail::Shadow {
            shadow,
            variant: Variant::MirrorAxis2,
        };
        assert!(events.iter().all(|e| e.target == line && e.detail == detail));
    }

    #[test]
    fn interaction_events_are_forwarded_from_shadows() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();
        let seen: Rc<RefCell<Vec<ShapeEvent>>> = Rc::default();
        let log = Rc::clone(&seen);
        scene.on(line, "click", move |e| log.borrow_mut().push(e.clone())).unwrap();

        scene.fire(shadow, "click").unwrap();
        scene.fire(line, "click").unwrap();
        scene.fire(shadow, "keypress").unwrap();

        let events = seen.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].target, line);
        assert_eq!(
            events[0].origin,
            Some(ShadowOrigin {
                shadow,
                variant: Variant::MirrorAxis2
            })
        );
        assert!(!events[1].from_shadow());
    }

    #[test]
    fn removing_a_primary_drops_its_shadows() {
        let mut scene = world();
        let line = attached(&mut scene, Shape::polyline(flat(&[170.0, -170.0], 10.0)));
        let shadow = scene.shadow(line, Variant::MirrorAxis2).unwrap();

        assert!(scene.remove(shadow).is_err());
        let removed = scene.remove(line).unwrap();
        assert_eq!(removed.kind(), ShapeKind::Polyline);
        assert!(scene.is_empty());
        assert!(scene.surface().is_empty());
    }

    #[test]
    fn opted_out_shapes_never_get_shadows() {
        let mut scene = world();
        let line = attached(
            &mut scene,
            Shape::polyline(flat(&[170.0, -170.0], 10.0)).without_shadow(),
        );
        assert!(scene.shadows(line).is_empty());
        assert_eq!(vertices(&scene, line), flat(&[170.0, -170.0], 10.0));
    }
}
