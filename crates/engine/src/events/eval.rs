use super::event::{Context, Value, keys};
use super::queue::EventQueue;
use crate::blocks::{Forest, Node, RuleNum, VarBlock};
use crate::rules::predicates::{ArgError, Args};
use crate::rules::{RuleDefinition, RuleKind};
use crate::world::World;
use crate::world::shape::{ShapeId, ShapeKind};

/// Evaluate the block `num` and, depending on its kind, its subtree.
///
/// Failures inside a block (unbound context variable, stale shape, bad
/// value) are logged and turn the block into a no-op; they never abort the
/// surrounding drain.
pub fn execute(forest: &Forest, num: RuleNum, ctx: &Context, world: &mut World, queue: &mut EventQueue) {
    let Some(node) = forest.node(num) else {
        return;
    };
    let def = node.def();

    match def.kind {
        RuleKind::Trigger => run_children(forest, node, ctx, world, queue),
        RuleKind::For => {
            let filter = match shape_filter(def, node.vars()) {
                Ok(filter) => filter,
                Err(err) => {
                    tracing::debug!("skipping for block {} ({}): {}", num, def.id, err);
                    return;
                }
            };
            // Shapes spawned by the loop body are not visited in this pass.
            let ids: Vec<ShapeId> = world
                .shapes()
                .filter(|shape| filter.is_none_or(|kind| shape.kind == kind))
                .map(|shape| shape.id)
                .collect();
            for id in ids {
                let Some(shape) = world.shape(id) else {
                    continue;
                };
                if ctx.contains(keys::EVENT_SHAPE_TYPE) {
                    run_children(forest, node, ctx, world, queue);
                } else {
                    let mut derived = ctx.clone();
                    derived.extend(&shape.context());
                    run_children(forest, node, &derived, world, queue);
                }
            }
        }
        RuleKind::If => {
            let Some(predicate) = def.predicate else {
                return;
            };
            let outcome = resolve_args(def, node.vars(), ctx).and_then(|args| predicate(&Args::new(&args)));
            match outcome {
                Ok(true) => run_children(forest, node, ctx, world, queue),
                Ok(false) => {}
                Err(err) => tracing::debug!("if block {} ({}) treated as false: {}", num, def.id, err),
            }
        }
        RuleKind::Do => {
            let Some(action) = def.action else {
                return;
            };
            let outcome =
                resolve_args(def, node.vars(), ctx).and_then(|args| (action.handler)(world, queue, &Args::new(&args)));
            if let Err(err) = outcome {
                tracing::debug!("do block {} ({}) skipped: {}", num, def.id, err);
            }
        }
    }
}

fn run_children(forest: &Forest, node: &Node, ctx: &Context, world: &mut World, queue: &mut EventQueue) {
    for &child in node.children() {
        execute(forest, child, ctx, world, queue);
    }
}

fn shape_filter(def: &RuleDefinition, vars: &[VarBlock]) -> Result<Option<ShapeKind>, ArgError> {
    if def.user_vars.is_empty() {
        return Ok(None);
    }
    let values: Vec<Value> = vars.iter().map(|v| Value::from(v.value.clone())).collect();
    Args::new(&values).shape_kind(0).map(Some)
}

/// Positional arguments for an IF predicate or DO action: the block's bound
/// values in slot order, then each context variable the block declares that
/// is not already a user slot, in declared order.
pub fn resolve_args(def: &RuleDefinition, vars: &[VarBlock], ctx: &Context) -> Result<Vec<Value>, ArgError> {
    let mut args: Vec<Value> = vars.iter().map(|v| Value::from(v.value.clone())).collect();
    for name in def.bound_context_vars() {
        let value = ctx
            .get(name)
            .ok_or_else(|| ArgError::MissingContext(name.to_string()))?;
        args.push(value.clone());
    }
    Ok(args)
}
