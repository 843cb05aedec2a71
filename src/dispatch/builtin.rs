//! Implementations of the standard operations.
//!
//! These run on one shape only; propagation to shadows is handled by the
//! scene before and after they run.

use crate::error::{OperationError, Result};
use crate::geometry::Bounds;
use crate::scene::OpContext;
use crate::shape::{Overlay, Shape, Stacking};
use crate::surface::Surface;

use super::{ops, Args, Value};

#[derive(Clone, Copy)]
enum Slot {
    Tooltip,
    Popup,
}

impl Slot {
    fn of(self, shape: &mut Shape) -> &mut Option<Overlay> {
        match self {
            Slot::Tooltip => &mut shape.tooltip,
            Slot::Popup => &mut shape.popup,
        }
    }
}

fn bind<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value], slot: Slot) -> Result<Value> {
    let content = Args::new(ctx.op(), args).text(0)?;
    *slot.of(ctx.shape_mut()?) = Some(Overlay::new(content));
    Ok(ctx.this())
}

fn unbind<S: Surface>(ctx: &mut OpContext<'_, S>, slot: Slot) -> Result<Value> {
    *slot.of(ctx.shape_mut()?) = None;
    Ok(ctx.this())
}

/// Opens the overlay, binding `args[0]` first if given, anchored at `args[1]`.
fn open<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value], slot: Slot) -> Result<Value> {
    let args = Args::new(ctx.op(), args);
    let content = args.opt_text(0)?;
    let anchor = args.opt_coord(1)?;

    let overlay = slot.of(ctx.shape_mut()?);
    if let Some(content) = content {
        *overlay = Some(Overlay::new(content));
    }
    if let Some(overlay) = overlay.as_mut() {
        overlay.open = true;
        overlay.anchor = anchor;
    }
    Ok(ctx.this())
}

fn close<S: Surface>(ctx: &mut OpContext<'_, S>, slot: Slot) -> Result<Value> {
    if let Some(overlay) = slot.of(ctx.shape_mut()?).as_mut() {
        overlay.open = false;
    }
    Ok(ctx.this())
}

fn toggle<S: Surface>(ctx: &mut OpContext<'_, S>, slot: Slot) -> Result<Value> {
    if let Some(overlay) = slot.of(ctx.shape_mut()?).as_mut() {
        overlay.open = !overlay.open;
    }
    Ok(ctx.this())
}

pub fn bind_tooltip<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    bind(ctx, args, Slot::Tooltip)
}

pub fn unbind_tooltip<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    unbind(ctx, Slot::Tooltip)
}

pub fn open_tooltip<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    open(ctx, args, Slot::Tooltip)
}

pub fn close_tooltip<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    close(ctx, Slot::Tooltip)
}

pub fn toggle_tooltip<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    toggle(ctx, Slot::Tooltip)
}

pub fn bind_popup<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    bind(ctx, args, Slot::Popup)
}

pub fn unbind_popup<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    unbind(ctx, Slot::Popup)
}

pub fn open_popup<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    open(ctx, args, Slot::Popup)
}

pub fn close_popup<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    close(ctx, Slot::Popup)
}

pub fn toggle_popup<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    toggle(ctx, Slot::Popup)
}

fn restack<S: Surface>(ctx: &mut OpContext<'_, S>, stacking: Stacking) -> Result<Value> {
    ctx.shape_mut()?.stacking = stacking;
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn bring_to_back<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    restack(ctx, Stacking::Back)
}

pub fn bring_to_front<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    restack(ctx, Stacking::Front)
}

/// Merges `args[0]` into the current style.
pub fn set_style<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let style = Args::new(ctx.op(), args).style(0)?;
    ctx.shape_mut()?.style.merge(style);
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn redraw<S: Surface>(ctx: &mut OpContext<'_, S>, _: &[Value]) -> Result<Value> {
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn set_z_index_offset<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let offset = Args::new(ctx.op(), args).number(0)?;
    ctx.shape_mut()?.z_index_offset = offset;
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn set_icon<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let icon = Args::new(ctx.op(), args).text(0)?;
    ctx.shape_mut()?.icon = Some(icon.to_string());
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn set_opacity<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let opacity = Args::new(ctx.op(), args).number(0)?;
    ctx.shape_mut()?.opacity = opacity;
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn set_lat_lng<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let position = Args::new(ctx.op(), args).coord(0)?;
    ctx.shape_mut()?.set_position(position)?;
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn set_radius<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let radius = Args::new(ctx.op(), args).number(0)?;
    ctx.shape_mut()?.set_radius(radius);
    ctx.redraw()?;
    Ok(ctx.this())
}

/// Appends `args[0]` to the last ring.
pub fn add_lat_lng<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let c = Args::new(ctx.op(), args).coord(0)?;
    ctx.shape_mut()?.path_mut()?.push(c);
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn convert_lat_lngs<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let vertices = Args::new(ctx.op(), args).vertices(0)?;
    Ok(Value::Vertices(vertices.clone()))
}

/// Polygon rings are implicitly closed; a repeated first vertex is dropped.
pub fn convert_polygon_lat_lngs<S: Surface>(
    ctx: &mut OpContext<'_, S>,
    args: &[Value],
) -> Result<Value> {
    let vertices = Args::new(ctx.op(), args).vertices(0)?;
    Ok(Value::Vertices(vertices.without_closing_vertex()))
}

/// Replaces the vertex list with the converted `args[0]`.
pub fn set_lat_lngs<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let vertices = Args::new(ctx.op(), args).vertices(0)?;
    let converted = ctx.invoke(ops::CONVERT_LAT_LNGS, &[Value::Vertices(vertices.clone())])?;
    let Value::Vertices(converted) = converted else {
        return Err(OperationError::Failed(format!(
            "{} did not return a vertex list",
            ops::CONVERT_LAT_LNGS
        ))
        .into());
    };
    ctx.shape_mut()?.set_path(converted)?;
    ctx.redraw()?;
    Ok(ctx.this())
}

pub fn bounds_to_lat_lngs<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let bounds = Args::new(ctx.op(), args).bounds(0)?;
    Ok(Value::Vertices(bounds.ring()))
}

/// Reshapes a rectangle to cover `args[0]`.
pub fn set_bounds<S: Surface>(ctx: &mut OpContext<'_, S>, args: &[Value]) -> Result<Value> {
    let ring = ctx.invoke(ops::BOUNDS_TO_LAT_LNGS, args)?;
    ctx.invoke(ops::SET_LAT_LNGS, &[ring])?;
    Ok(ctx.this())
}

/// Converts vertex-list arguments of structural operations to bounds.
///
/// Lets rectangles be built from coordinate lists like other path shapes.
#[must_use]
pub fn migrate(op: &str, args: &[Value]) -> Vec<Value> {
    if op != ops::BOUNDS_TO_LAT_LNGS {
        return args.to_vec();
    }
    args.iter()
        .enumerate()
        .map(|(i, value)| match value {
            Value::Vertices(v) if i == 0 => {
                Bounds::from_coords(&v.coords()).map_or(Value::None, Value::Bounds)
            }
            other => other.clone(),
        })
        .collect()
}
