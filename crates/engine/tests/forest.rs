//! Authoring operations on the block forest: create, reparent, delete,
//! rule swaps and variable edits, plus the exactly-once reachability
//! invariant under random edit sequences.

use chaos_engine::rules::rules_of_kind;
use chaos_engine::{Engine, EngineError, RuleKind, RuleNum, VarType, VarValue};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn add(engine: &mut Engine, kind: RuleKind, id: &str) -> RuleNum {
    engine.add_rule(kind, id).unwrap().rule_num
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[test]
fn new_block_is_a_root_with_default_vars() {
    let mut engine = Engine::default();
    let block = engine.add_rule_at(RuleKind::If, "size_compare", (40.0, 300.0)).unwrap();

    assert_eq!(block.rule_id, "size_compare");
    assert_eq!(block.label, "IF rectangle shape size is > 0");
    assert_eq!(block.vars.len(), 3);
    assert_eq!(block.vars[0].var_type, VarType::ShapeType);
    assert_eq!(block.vars[0].value, VarValue::from("rectangle"));
    assert_eq!(block.vars[0].label, "a: rectangle");
    assert_eq!(block.vars[0].position, (40.0, 270.0));
    assert_eq!(block.vars[2].position, (40.0, 210.0));
    assert!(block.vars.iter().all(|v| v.owner_rule_num == block.rule_num));

    let forest = engine.forest();
    assert_eq!(forest.len(), 1);
    assert!(forest.contains_key(&block.rule_num));
}

#[test]
fn rule_numbers_are_monotonic() {
    let mut engine = Engine::default();
    let a = add(&mut engine, RuleKind::Trigger, "start");
    let b = add(&mut engine, RuleKind::Do, "spawn");
    engine.delete_rule(b).unwrap();
    let c = add(&mut engine, RuleKind::Do, "spawn");
    assert!(a < b && b < c);
}

#[test]
fn unknown_rule_is_rejected() {
    let mut engine = Engine::default();
    assert!(matches!(
        engine.add_rule(RuleKind::Do, "teleport"),
        Err(EngineError::UnknownRule { .. })
    ));
    assert!(engine.forest().is_empty());
}

// ---------------------------------------------------------------------------
// Reparent
// ---------------------------------------------------------------------------

#[test]
fn reparent_moves_subtree() {
    let mut engine = Engine::default();
    let trigger = add(&mut engine, RuleKind::Trigger, "every_update");
    let each = add(&mut engine, RuleKind::For, "every_shape");
    let action = add(&mut engine, RuleKind::Do, "destroy");

    engine.reparent_rule(action, Some(each)).unwrap();
    engine.reparent_rule(each, Some(trigger)).unwrap();

    let forest = engine.forest();
    assert_eq!(forest.len(), 1);
    let root = &forest[&trigger];
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].rule_num, each);
    assert_eq!(root.children[0].children[0].rule_num, action);
    engine.blocks().check_integrity().unwrap();

    engine.reparent_rule(each, None).unwrap();
    let forest = engine.forest();
    assert_eq!(forest.len(), 2);
    assert!(forest[&trigger].children.is_empty());
    engine.blocks().check_integrity().unwrap();
}

#[test]
fn cycle_is_rejected_and_tree_unchanged() {
    let mut engine = Engine::default();
    let trigger = add(&mut engine, RuleKind::Trigger, "every_update");
    let outer = add(&mut engine, RuleKind::For, "every_shape");
    let inner = add(&mut engine, RuleKind::If, "shape_is");
    engine.reparent_rule(outer, Some(trigger)).unwrap();
    engine.reparent_rule(inner, Some(outer)).unwrap();
    let before = engine.forest();

    assert!(matches!(
        engine.reparent_rule(outer, Some(inner)),
        Err(EngineError::Cycle { .. })
    ));
    assert!(matches!(
        engine.reparent_rule(outer, Some(outer)),
        Err(EngineError::Cycle { .. })
    ));
    assert_eq!(engine.forest(), before);
}

#[test]
fn trigger_cannot_be_nested() {
    let mut engine = Engine::default();
    let a = add(&mut engine, RuleKind::Trigger, "start");
    let b = add(&mut engine, RuleKind::Trigger, "every_update");
    assert!(matches!(
        engine.reparent_rule(b, Some(a)),
        Err(EngineError::InvalidPlacement { .. })
    ));
}

#[test]
fn do_blocks_have_no_children() {
    let mut engine = Engine::default();
    let parent = add(&mut engine, RuleKind::Do, "spawn");
    let child = add(&mut engine, RuleKind::Do, "change_y_gravity");
    assert!(matches!(
        engine.reparent_rule(child, Some(parent)),
        Err(EngineError::InvalidPlacement { .. })
    ));
}

#[test]
fn shape_action_needs_a_shape_provider() {
    let mut engine = Engine::default();
    let start = add(&mut engine, RuleKind::Trigger, "start");
    let change_x = add(&mut engine, RuleKind::Do, "change_x");

    assert!(matches!(
        engine.reparent_rule(change_x, Some(start)),
        Err(EngineError::Incompatible { .. })
    ));
    assert!(engine.forest()[&start].children.is_empty());

    // A FOR loop in between provides the shape.
    let each = add(&mut engine, RuleKind::For, "every_shape");
    engine.reparent_rule(each, Some(start)).unwrap();
    engine.reparent_rule(change_x, Some(each)).unwrap();
    engine.blocks().check_integrity().unwrap();
}

#[test]
fn moved_subtree_is_checked_as_a_whole() {
    let mut engine = Engine::default();
    let each = add(&mut engine, RuleKind::For, "every_shape");
    let color = add(&mut engine, RuleKind::Do, "change_color");
    engine.reparent_rule(color, Some(each)).unwrap();

    // Legal on its own, but `destroyed` forbids change_color anywhere below it.
    let destroyed = add(&mut engine, RuleKind::Trigger, "destroyed");
    assert!(matches!(
        engine.reparent_rule(each, Some(destroyed)),
        Err(EngineError::Incompatible { .. })
    ));
}

#[test]
fn incompatible_if_is_rejected() {
    let mut engine = Engine::default();
    let update = add(&mut engine, RuleKind::Trigger, "every_update");
    let each = add(&mut engine, RuleKind::For, "every_shape");
    let spawns = add(&mut engine, RuleKind::If, "spawns");
    engine.reparent_rule(each, Some(update)).unwrap();
    assert!(matches!(
        engine.reparent_rule(spawns, Some(each)),
        Err(EngineError::Incompatible { .. })
    ));
}

#[test]
fn unknown_parent_is_rejected() {
    let mut engine = Engine::default();
    let a = add(&mut engine, RuleKind::Do, "spawn");
    assert!(matches!(
        engine.reparent_rule(a, Some(RuleNum(999))),
        Err(EngineError::UnknownBlock(RuleNum(999)))
    ));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_removes_whole_subtree() {
    let mut engine = Engine::default();
    let trigger = add(&mut engine, RuleKind::Trigger, "every_update");
    let each = add(&mut engine, RuleKind::For, "every_shape");
    let check = add(&mut engine, RuleKind::If, "shape_is");
    let action = add(&mut engine, RuleKind::Do, "destroy");
    engine.reparent_rule(each, Some(trigger)).unwrap();
    engine.reparent_rule(check, Some(each)).unwrap();
    engine.reparent_rule(action, Some(check)).unwrap();

    assert_eq!(engine.delete_rule(each).unwrap(), 3);
    assert_eq!(engine.blocks().len(), 1);
    assert!(engine.forest()[&trigger].children.is_empty());
    assert!(matches!(engine.delete_rule(action), Err(EngineError::UnknownBlock(_))));
    engine.blocks().check_integrity().unwrap();
}

// ---------------------------------------------------------------------------
// Rule swaps and variable edits
// ---------------------------------------------------------------------------

#[test]
fn change_rule_id_keeps_matching_values() {
    let mut engine = Engine::default();
    let num = add(&mut engine, RuleKind::Do, "change_x");
    engine.edit_var(num, 0, 50.0).unwrap();

    engine.change_rule_id(num, "move_y").unwrap();
    let block = &engine.forest()[&num];
    assert_eq!(block.rule_id, "move_y");
    assert_eq!(block.vars[0].value, VarValue::Number(50.0));
    assert_eq!(block.label, "Move this shape's Y by 50");

    engine.change_rule_id(num, "change_color").unwrap();
    let block = &engine.forest()[&num];
    assert_eq!(block.vars[0].var_type, VarType::Color);
    assert_eq!(block.vars[0].value, VarValue::from("WHITE"));

    engine.change_rule_id(num, "destroy").unwrap();
    assert!(engine.forest()[&num].vars.is_empty());
}

#[test]
fn change_rule_id_reverts_when_placement_breaks() {
    let mut engine = Engine::default();
    let trigger = add(&mut engine, RuleKind::Trigger, "color_changes");
    let action = add(&mut engine, RuleKind::Do, "change_size");
    engine.edit_var(action, 0, 30.0).unwrap();
    engine.reparent_rule(action, Some(trigger)).unwrap();
    let before = engine.forest();

    assert!(matches!(
        engine.change_rule_id(action, "change_color"),
        Err(EngineError::Incompatible { .. })
    ));
    assert_eq!(engine.forest(), before);
}

#[test]
fn change_rule_id_rechecks_children_of_a_root() {
    let mut engine = Engine::default();
    let trigger = add(&mut engine, RuleKind::Trigger, "spawns");
    let action = add(&mut engine, RuleKind::Do, "destroy");
    engine.reparent_rule(action, Some(trigger)).unwrap();

    // `start` provides no shape for `destroy`.
    assert!(engine.change_rule_id(trigger, "start").is_err());
    assert_eq!(engine.forest()[&trigger].rule_id, "spawns");
    engine.change_rule_id(trigger, "collides").unwrap();
}

#[test]
fn change_rule_id_stays_within_kind() {
    let mut engine = Engine::default();
    let num = add(&mut engine, RuleKind::Do, "spawn");
    assert!(matches!(
        engine.change_rule_id(num, "every_shape"),
        Err(EngineError::UnknownRule { .. })
    ));
}

#[test]
fn edit_var_validates_and_relabels() {
    let mut engine = Engine::default();
    let num = add(&mut engine, RuleKind::Do, "change_size");

    engine.edit_var(num, 0, "30").unwrap();
    let block = &engine.forest()[&num];
    assert_eq!(block.vars[0].value, VarValue::Number(30.0));
    assert_eq!(block.vars[0].label, "a: 30");
    assert_eq!(block.label, "Change this shape's size to 30");

    assert!(matches!(
        engine.edit_var(num, 0, 9999.0),
        Err(EngineError::InvalidVarValue { .. })
    ));
    assert!(matches!(
        engine.edit_var(num, 1, 10.0),
        Err(EngineError::VarIndex { index: 1, .. })
    ));
    assert_eq!(engine.forest()[&num].vars[0].value, VarValue::Number(30.0));
}

#[test]
fn move_rule_drags_vars_along() {
    let mut engine = Engine::default();
    let num = add(&mut engine, RuleKind::Do, "change_color");
    engine.move_rule(num, (500.0, 500.0)).unwrap();
    let block = &engine.forest()[&num];
    assert_eq!(block.position, (500.0, 500.0));
    assert_eq!(block.vars[0].position, (500.0, 470.0));
}

// ---------------------------------------------------------------------------
// Exactly-once reachability under random edits
// ---------------------------------------------------------------------------

#[test]
fn random_edits_never_orphan_or_duplicate() {
    let catalog: Vec<(RuleKind, &str)> = RuleKind::ALL
        .iter()
        .flat_map(|kind| rules_of_kind(*kind).iter().map(move |def| (*kind, def.id)))
        .collect();

    for seed in 0..20u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut engine = Engine::default();
        let mut nums: Vec<RuleNum> = Vec::new();

        for _ in 0..200 {
            match rng.gen_range(0..10) {
                0..=3 => {
                    let (kind, id) = *catalog.choose(&mut rng).unwrap();
                    nums.push(add(&mut engine, kind, id));
                }
                4..=8 if !nums.is_empty() => {
                    let child = *nums.choose(&mut rng).unwrap();
                    let parent = if rng.gen_bool(0.2) {
                        None
                    } else {
                        Some(*nums.choose(&mut rng).unwrap())
                    };
                    let before = engine.forest();
                    if engine.reparent_rule(child, parent).is_err() {
                        assert_eq!(engine.forest(), before, "failed reparent changed the forest");
                    }
                }
                _ if !nums.is_empty() => {
                    let victim = *nums.choose(&mut rng).unwrap();
                    engine.delete_rule(victim).unwrap();
                    nums.retain(|n| engine.blocks().contains(*n));
                }
                _ => {}
            }
            if let Err(problem) = engine.blocks().check_integrity() {
                panic!("seed {seed}: {problem}");
            }
        }

        let reachable: usize = engine.forest().values().map(|b| b.subtree_len()).sum();
        assert_eq!(reachable, engine.blocks().len(), "seed {seed}");
    }
}
