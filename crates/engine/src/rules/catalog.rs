//! Static catalog tables.

use super::predicates::{self, PredicateFn};
use super::{ActionBinding, ActionTarget, RuleDefinition, RuleKind, VarType};
use crate::events::event::{keys, names};
use crate::world::actions::ActionKind;

pub const SHAPES: &[&str] = &["rectangle", "circle", "triangle"];

pub const ALLOWED_INPUT: &[&str] = &["a", "b", "c", "d", "e", "q", "w", "s", "t"];

pub const COMPARISONS: &[&str] = &[">", ">=", "<", "<=", "==", "!="];

pub const COLORS: &[&str] = &[
    "BLACK", "WHITE", "GRAY", "DARK_GRAY", "CYAN",
    "AMBER", "AQUA", "GREEN", "LIGHT_GREEN",
    "RED", "LIGHT_RED", "DARK_RED",
    "BLUE", "LIGHT_BLUE", "DARK_BLUE",
    "YELLOW", "LIGHT_YELLOW", "DARK_YELLOW",
    "MAGENTA", "PURPLE", "VIOLET", "INDIGO",
    "ORANGE", "BROWN",
    "GOLD", "SILVER", "BRONZE",
    "TEAL", "AZURE",
    "PINK", "HOT_PINK",
    "MINT_GREEN", "CHARTREUSE",
];

// ── Constructors ─────────────────────────────────────────────────────────

const fn trigger(
    id: &'static str,
    description: &'static str,
    event: &'static str,
    provides_shape: bool,
) -> RuleDefinition {
    RuleDefinition {
        id,
        kind: RuleKind::Trigger,
        description,
        user_vars: &[],
        context_vars: &[],
        trigger: Some(event),
        predicate: None,
        action: None,
        provides_shape,
        needs_shape: false,
    }
}

const fn condition(
    id: &'static str,
    description: &'static str,
    user_vars: &'static [VarType],
    context_vars: &'static [&'static str],
    predicate: PredicateFn,
    needs_shape: bool,
) -> RuleDefinition {
    RuleDefinition {
        id,
        kind: RuleKind::If,
        description,
        user_vars,
        context_vars,
        trigger: None,
        predicate: Some(predicate),
        action: None,
        provides_shape: false,
        needs_shape,
    }
}

const fn each(id: &'static str, description: &'static str, user_vars: &'static [VarType]) -> RuleDefinition {
    RuleDefinition {
        id,
        kind: RuleKind::For,
        description,
        user_vars,
        context_vars: &[],
        trigger: None,
        predicate: None,
        action: None,
        provides_shape: true,
        needs_shape: false,
    }
}

const fn action(
    id: &'static str,
    description: &'static str,
    user_vars: &'static [VarType],
    context_vars: &'static [&'static str],
    target: ActionTarget,
    kind: ActionKind,
) -> RuleDefinition {
    RuleDefinition {
        id,
        kind: RuleKind::Do,
        description,
        user_vars,
        context_vars,
        trigger: None,
        predicate: None,
        action: Some(ActionBinding::new(target, kind)),
        provides_shape: false,
        needs_shape: matches!(target, ActionTarget::PerShape),
    }
}

// ── TRIGGER ──────────────────────────────────────────────────────────────

pub static TRIGGER_RULES: &[RuleDefinition] = &[
    trigger("start", "When the game starts", names::GAME_LAUNCH, false),
    trigger("every_update", "Every update", names::EVERY_UPDATE, false),
    trigger("on_left_click", "When you left click", names::LEFT_CLICK, false),
    trigger("on_right_click", "When you right click", names::RIGHT_CLICK, false),
    trigger("on_mouse_move", "When the mouse moves", names::MOUSE_MOVE, false),
    trigger("on_input", "When a key is pressed", names::INPUT, false),
    trigger("spawns", "When a shape spawns", names::SPAWN, true),
    trigger("destroyed", "When a shape is destroyed", names::DESTROYED, true),
    trigger("collides", "When two shapes collide", names::COLLISION, true),
    trigger("x_changes", "When a shape's X changes", names::X_CHANGE, true),
    trigger("y_changes", "When a shape's Y changes", names::Y_CHANGE, true),
    trigger("x_velocity_changes", "When a shape's X velocity changes", names::X_VELOCITY_CHANGE, true),
    trigger("y_velocity_changes", "When a shape's Y velocity changes", names::Y_VELOCITY_CHANGE, true),
    trigger("color_changes", "When a shape's color changes", names::COLOR_CHANGE, true),
    trigger("size_changes", "When a shape's size changes", names::SIZE_CHANGE, true),
    trigger("x_gravity_changes", "When X gravity changes", names::X_GRAVITY_CHANGE, false),
    trigger("y_gravity_changes", "When Y gravity changes", names::Y_GRAVITY_CHANGE, false),
];

// ── IF ───────────────────────────────────────────────────────────────────

const COMPARE_VARS: &[VarType] = &[VarType::ShapeType, VarType::Comparison, VarType::NumericRange];
const SHAPE_EVENT_CONTEXT: &[&str] = &[keys::EVENT_SHAPE_TYPE, keys::EVENT];

pub static IF_RULES: &[RuleDefinition] = &[
    condition(
        "x_position_compare",
        "IF X for {a} shape is {b} {c}",
        COMPARE_VARS,
        &[keys::EVENT_SHAPE_TYPE, keys::SHAPE_X],
        predicates::compare_measure,
        true,
    ),
    condition(
        "y_position_compare",
        "IF Y for {a} shape is {b} {c}",
        COMPARE_VARS,
        &[keys::EVENT_SHAPE_TYPE, keys::SHAPE_Y],
        predicates::compare_measure,
        true,
    ),
    condition(
        "size_compare",
        "IF {a} shape size is {b} {c}",
        COMPARE_VARS,
        &[keys::EVENT_SHAPE_TYPE, keys::SHAPE_SIZE],
        predicates::compare_measure,
        true,
    ),
    condition(
        "shape_is",
        "IF this is a {a}",
        &[VarType::ShapeType],
        &[keys::EVENT_SHAPE_TYPE],
        predicates::equals,
        true,
    ),
    condition(
        "color_is",
        "IF this shape's color is {a}",
        &[VarType::Color],
        &[keys::SHAPE_COLOR],
        predicates::equals,
        true,
    ),
    condition(
        "spawns",
        "IF {a} shape spawns",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::spawns,
        true,
    ),
    condition(
        "destroyed",
        "IF {a} shape is destroyed",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::destroyed,
        true,
    ),
    condition(
        "x_velocity_changes",
        "IF {a} shape X velocity changes",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::x_velocity_changes,
        true,
    ),
    condition(
        "y_velocity_changes",
        "IF {a} shape Y velocity changes",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::y_velocity_changes,
        true,
    ),
    condition(
        "color_changes",
        "IF {a} shape color changes",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::color_changes,
        true,
    ),
    condition(
        "size_changes",
        "IF {a} shape size changes",
        &[VarType::ShapeType],
        SHAPE_EVENT_CONTEXT,
        predicates::size_changes,
        true,
    ),
    condition(
        "collides",
        "IF {a} shape collides with {b}",
        &[VarType::ShapeType, VarType::TargetType],
        &[keys::EVENT_A_TYPE, keys::EVENT_B_TYPE, keys::EVENT],
        predicates::collides,
        true,
    ),
    condition(
        "key_pressed",
        "IF {a} key is pressed",
        &[VarType::KeyInput],
        &[keys::EVENT_KEY],
        predicates::equals,
        false,
    ),
];

// ── FOR ──────────────────────────────────────────────────────────────────

pub static FOR_RULES: &[RuleDefinition] = &[
    each("every_shape", "For every shape", &[]),
    each("every_shape_of_type", "For every {a} shape", &[VarType::ShapeType]),
];

// ── DO ───────────────────────────────────────────────────────────────────

const SHAPE_AND_VARIABLE: &[&str] = &[keys::SHAPE, "variable"];

pub static DO_RULES: &[RuleDefinition] = &[
    action(
        "change_x",
        "Change this shape's X to {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::ChangeX,
    ),
    action(
        "change_y",
        "Change this shape's Y to {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::ChangeY,
    ),
    action(
        "move_x",
        "Move this shape's X by {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::MoveX,
    ),
    action(
        "move_y",
        "Move this shape's Y by {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::MoveY,
    ),
    action(
        "change_x_velocity",
        "Change X velocity of this to {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::ChangeXVelocity,
    ),
    action(
        "change_y_velocity",
        "Change Y velocity of this to {a}",
        &[VarType::NumericRange],
        SHAPE_AND_VARIABLE,
        ActionTarget::PerShape,
        ActionKind::ChangeYVelocity,
    ),
    action(
        "change_color",
        "Change this shape's color to {a}",
        &[VarType::Color],
        &[keys::SHAPE, "color"],
        ActionTarget::PerShape,
        ActionKind::ChangeColor,
    ),
    action(
        "change_size",
        "Change this shape's size to {a}",
        &[VarType::Size],
        &[keys::SHAPE, "size"],
        ActionTarget::PerShape,
        ActionKind::ChangeSize,
    ),
    action(
        "destroy",
        "Destroy this",
        &[],
        &[keys::SHAPE],
        ActionTarget::PerShape,
        ActionKind::Destroy,
    ),
    action(
        "morph_into",
        "Morph this into {a}",
        &[VarType::ShapeType],
        &[keys::SHAPE, "shape_type"],
        ActionTarget::PerShape,
        ActionKind::Morph,
    ),
    action(
        "change_x_gravity",
        "Change X gravity to {a}",
        &[VarType::NumericRange],
        &["variable"],
        ActionTarget::Global,
        ActionKind::ChangeXGravity,
    ),
    action(
        "change_y_gravity",
        "Change Y gravity to {a}",
        &[VarType::NumericRange],
        &["variable"],
        ActionTarget::Global,
        ActionKind::ChangeYGravity,
    ),
    action(
        "spawn",
        "Spawn {a}",
        &[VarType::ShapeType],
        &["shape_type"],
        ActionTarget::Global,
        ActionKind::Spawn,
    ),
];
