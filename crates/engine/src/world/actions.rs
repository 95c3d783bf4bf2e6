//! DO action handlers.
//!
//! Per-shape actions take `(user value.., shape)`; global actions take only
//! their user values. Every action enqueues the event that describes its
//! effect, so reactions run later in the same drain.

use super::World;
use super::shape::Shape;
use crate::events::event::names;
use crate::events::queue::EventQueue;
use crate::rules::predicates::{ArgError, Args};

pub type ActionFn = fn(&mut World, &mut EventQueue, &Args<'_>) -> Result<(), ArgError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ChangeX,
    ChangeY,
    MoveX,
    MoveY,
    ChangeXVelocity,
    ChangeYVelocity,
    ChangeColor,
    ChangeSize,
    Destroy,
    Morph,
    ChangeXGravity,
    ChangeYGravity,
    Spawn,
}

impl ActionKind {
    pub const fn handler(self) -> ActionFn {
        match self {
            ActionKind::ChangeX => change_x,
            ActionKind::ChangeY => change_y,
            ActionKind::MoveX => move_x,
            ActionKind::MoveY => move_y,
            ActionKind::ChangeXVelocity => change_x_velocity,
            ActionKind::ChangeYVelocity => change_y_velocity,
            ActionKind::ChangeColor => change_color,
            ActionKind::ChangeSize => change_size,
            ActionKind::Destroy => destroy,
            ActionKind::Morph => morph,
            ActionKind::ChangeXGravity => change_x_gravity,
            ActionKind::ChangeYGravity => change_y_gravity,
            ActionKind::Spawn => spawn,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::ChangeX => "change_x",
            ActionKind::ChangeY => "change_y",
            ActionKind::MoveX => "move_x",
            ActionKind::MoveY => "move_y",
            ActionKind::ChangeXVelocity => "change_x_velocity",
            ActionKind::ChangeYVelocity => "change_y_velocity",
            ActionKind::ChangeColor => "change_color",
            ActionKind::ChangeSize => "change_size",
            ActionKind::Destroy => "destroy",
            ActionKind::Morph => "morph_into",
            ActionKind::ChangeXGravity => "change_x_gravity",
            ActionKind::ChangeYGravity => "change_y_gravity",
            ActionKind::Spawn => "spawn",
        }
    }
}

// ── Per-shape ────────────────────────────────────────────────────────────

fn set_number(
    world: &mut World,
    queue: &mut EventQueue,
    args: &Args<'_>,
    event: &str,
    apply: fn(&mut Shape, f64),
) -> Result<(), ArgError> {
    let value = args.number(0)?;
    let id = args.shape(1)?;
    world.modify(id, event, queue, |shape| apply(shape, value))
}

fn change_x(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::X_CHANGE, |s, v| s.x = v)
}

fn change_y(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::Y_CHANGE, |s, v| s.y = v)
}

fn move_x(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::X_CHANGE, |s, v| s.x += v)
}

fn move_y(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::Y_CHANGE, |s, v| s.y += v)
}

fn change_x_velocity(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::X_VELOCITY_CHANGE, |s, v| s.x_velocity = v)
}

fn change_y_velocity(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::Y_VELOCITY_CHANGE, |s, v| s.y_velocity = v)
}

fn change_size(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    set_number(world, queue, args, names::SIZE_CHANGE, |s, v| s.size = v)
}

fn change_color(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    let color = args.text(0)?.to_string();
    let id = args.shape(1)?;
    world.modify(id, names::COLOR_CHANGE, queue, |shape| shape.color = color)
}

fn destroy(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    let id = args.shape(0)?;
    if world.destroy(id, queue) {
        Ok(())
    } else {
        Err(ArgError::StaleShape)
    }
}

fn morph(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    let kind = args.shape_kind(0)?;
    let id = args.shape(1)?;
    world.morph(id, kind, queue).map(|_| ()).ok_or(ArgError::StaleShape)
}

// ── Global ───────────────────────────────────────────────────────────────

fn change_x_gravity(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    world.set_x_gravity(args.number(0)?, queue);
    Ok(())
}

fn change_y_gravity(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    world.set_y_gravity(args.number(0)?, queue);
    Ok(())
}

fn spawn(world: &mut World, queue: &mut EventQueue, args: &Args<'_>) -> Result<(), ArgError> {
    world.spawn(args.shape_kind(0)?, queue);
    Ok(())
}
