//! A small built-in program: left clicks spawn circles, circles that fall
//! below y = 200 turn red, and turning red makes them grow.

use chaos_engine::events::event::{keys, names};
use chaos_engine::{Engine, EngineError, RuleKind, RuleNum};

use crate::input::{InputScript, ScriptedInput};

/// Ticks the demo runs when no tick count is given.
pub const DEMO_TICKS: u64 = 300;

/// Add the demo rulesets to `engine`. Returns their roots.
pub fn install(engine: &mut Engine) -> Result<Vec<RuleNum>, EngineError> {
    let click = engine.add_rule_at(RuleKind::Trigger, "on_left_click", (100.0, 900.0))?.rule_num;
    let spawn = engine.add_rule_at(RuleKind::Do, "spawn", (140.0, 840.0))?.rule_num;
    engine.reparent_rule(spawn, Some(click))?;
    engine.edit_var(spawn, 0, "circle")?;

    let update = engine.add_rule_at(RuleKind::Trigger, "every_update", (100.0, 600.0))?.rule_num;
    let each = engine.add_rule_at(RuleKind::For, "every_shape", (140.0, 540.0))?.rule_num;
    let low = engine.add_rule_at(RuleKind::If, "y_position_compare", (180.0, 480.0))?.rule_num;
    let paint = engine.add_rule_at(RuleKind::Do, "change_color", (220.0, 300.0))?.rule_num;
    engine.reparent_rule(each, Some(update))?;
    engine.reparent_rule(low, Some(each))?;
    engine.reparent_rule(paint, Some(low))?;
    engine.edit_var(low, 0, "circle")?;
    engine.edit_var(low, 1, "<")?;
    engine.edit_var(low, 2, 200.0)?;
    engine.edit_var(paint, 0, "RED")?;

    let changed = engine.add_rule_at(RuleKind::Trigger, "color_changes", (600.0, 900.0))?.rule_num;
    let circle = engine.add_rule_at(RuleKind::If, "color_changes", (640.0, 840.0))?.rule_num;
    let grow = engine.add_rule_at(RuleKind::Do, "change_size", (680.0, 720.0))?.rule_num;
    engine.reparent_rule(circle, Some(changed))?;
    engine.reparent_rule(grow, Some(circle))?;
    engine.edit_var(circle, 0, "circle")?;
    engine.edit_var(grow, 0, 30.0)?;

    tracing::info!("Demo program installed: {} blocks", engine.blocks().len());
    Ok(vec![click, update, changed])
}

/// Three clicks, five ticks apart.
pub fn script() -> InputScript {
    InputScript::new(
        [0, 5, 10]
            .into_iter()
            .map(|tick| {
                ScriptedInput::new(tick, names::LEFT_CLICK)
                    .with_arg(keys::MOUSE_X, 960)
                    .with_arg(keys::MOUSE_Y, 540)
            })
            .collect(),
    )
}
