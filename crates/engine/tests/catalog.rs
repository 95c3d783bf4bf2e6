//! Rule catalog lookups, templates, variable domains and compatibility
//! tables. Pure data; no engine state involved.

use chaos_engine::rules::compat::{is_action_compatible, is_trigger_pair_compatible};
use chaos_engine::rules::{ActionTarget, VarDomain, render_description, rule_definition, rules_of_kind};
use chaos_engine::{EngineError, RuleKind, VarType, VarValue};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[test]
fn lookup_known_rule() {
    let def = rule_definition(RuleKind::Do, "change_size").unwrap();
    assert_eq!(def.id, "change_size");
    assert_eq!(def.kind, RuleKind::Do);
    assert_eq!(def.user_vars, &[VarType::Size]);
}

#[test]
fn lookup_is_scoped_by_kind() {
    // `spawns` exists as a TRIGGER and as an IF, but not as a DO.
    assert!(rule_definition(RuleKind::Trigger, "spawns").is_ok());
    assert!(rule_definition(RuleKind::If, "spawns").is_ok());
    match rule_definition(RuleKind::Do, "spawns") {
        Err(EngineError::UnknownRule { kind, id }) => {
            assert_eq!(kind, RuleKind::Do);
            assert_eq!(id, "spawns");
        }
        other => panic!("expected UnknownRule, got {other:?}"),
    }
}

#[test]
fn unknown_rule_is_an_error() {
    assert!(matches!(
        rule_definition(RuleKind::If, "is_sunny"),
        Err(EngineError::UnknownRule { .. })
    ));
}

#[test]
fn catalog_entries_are_consistent() {
    for kind in RuleKind::ALL {
        for def in rules_of_kind(kind) {
            assert_eq!(def.kind, kind, "{} filed under the wrong kind", def.id);
            match kind {
                RuleKind::Trigger => {
                    assert!(def.trigger.is_some(), "{} has no event", def.id);
                    assert!(def.user_vars.is_empty());
                }
                RuleKind::If => assert!(def.predicate.is_some(), "{} has no predicate", def.id),
                RuleKind::For => assert!(def.provides_shape),
                RuleKind::Do => {
                    let action = def.action.expect("do rule without action");
                    assert_eq!(action.kind.name(), def.id);
                    assert_eq!(def.needs_shape, action.target == ActionTarget::PerShape);
                }
            }
        }
    }
}

#[test]
fn only_key_pressed_if_runs_without_shape() {
    let shapeless: Vec<_> = rules_of_kind(RuleKind::If)
        .iter()
        .filter(|d| !d.needs_shape)
        .map(|d| d.id)
        .collect();
    assert_eq!(shapeless, vec!["key_pressed"]);
}

// ---------------------------------------------------------------------------
// Templates and binding
// ---------------------------------------------------------------------------

#[test]
fn every_placeholder_is_filled() {
    for kind in RuleKind::ALL {
        for def in rules_of_kind(kind) {
            let text = render_description(def, None);
            assert!(!text.contains('{'), "{}: `{}`", def.id, text);
            let text = render_description(def, Some(&def.default_values()));
            assert!(!text.contains('{'), "{}: `{}`", def.id, text);
        }
    }
}

#[test]
fn render_with_symbolic_names() {
    let def = rule_definition(RuleKind::If, "y_position_compare").unwrap();
    assert_eq!(render_description(def, None), "IF Y for a shape is b c");
}

#[test]
fn render_with_bound_values() {
    let def = rule_definition(RuleKind::If, "y_position_compare").unwrap();
    let values = [VarValue::from("circle"), VarValue::from("<"), VarValue::Number(200.0)];
    assert_eq!(render_description(def, Some(&values)), "IF Y for circle shape is < 200");
}

#[test]
fn context_vars_drop_user_supplied_names() {
    let size = rule_definition(RuleKind::Do, "change_size").unwrap();
    assert_eq!(size.bound_context_vars().collect::<Vec<_>>(), vec!["shape"]);

    let compare = rule_definition(RuleKind::If, "y_position_compare").unwrap();
    assert_eq!(
        compare.bound_context_vars().collect::<Vec<_>>(),
        vec!["event_shape_type", "shape_y"]
    );

    let spawn = rule_definition(RuleKind::Do, "spawn").unwrap();
    assert_eq!(spawn.bound_context_vars().count(), 0);
}

// ---------------------------------------------------------------------------
// Variable domains
// ---------------------------------------------------------------------------

const ALL_VAR_TYPES: [VarType; 7] = [
    VarType::ShapeType,
    VarType::TargetType,
    VarType::NumericRange,
    VarType::Color,
    VarType::Size,
    VarType::KeyInput,
    VarType::Comparison,
];

#[test]
fn defaults_are_inside_their_domain() {
    for var_type in ALL_VAR_TYPES {
        let value = var_type.default_value();
        assert_eq!(var_type.coerce(value.clone()).unwrap(), value, "{var_type}");
    }
}

#[test]
fn option_domains_reject_unknown_text() {
    assert!(VarType::Color.coerce(VarValue::from("RED")).is_ok());
    assert!(matches!(
        VarType::Color.coerce(VarValue::from("red")),
        Err(EngineError::InvalidVarValue { .. })
    ));
    assert!(VarType::ShapeType.coerce(VarValue::Number(1.0)).is_err());
    assert!(VarType::KeyInput.coerce(VarValue::from("z")).is_err());
}

#[test]
fn range_domains_accept_numeric_text() {
    assert_eq!(VarType::Size.coerce(VarValue::from("25")).unwrap(), VarValue::Number(25.0));
    assert!(VarType::Size.coerce(VarValue::Number(0.0)).is_err());
    assert!(VarType::Size.coerce(VarValue::Number(500.0)).is_err());
    assert!(VarType::NumericRange.coerce(VarValue::Number(-700.0)).is_ok());
    assert!(VarType::NumericRange.coerce(VarValue::from("fast")).is_err());
}

#[test]
fn color_domain_has_every_named_color() {
    match VarType::Color.domain() {
        VarDomain::Options(colors) => {
            assert_eq!(colors.len(), 33);
            assert!(colors.contains(&"CHARTREUSE"));
        }
        VarDomain::Range { .. } => panic!("color is an option list"),
    }
}

#[test]
fn var_types_serialize_by_binding_name() {
    for var_type in ALL_VAR_TYPES {
        let json = serde_json::to_string(&var_type).unwrap();
        assert_eq!(json, format!("\"{}\"", var_type.name()));
    }
}

// ---------------------------------------------------------------------------
// Compatibility tables
// ---------------------------------------------------------------------------

#[test]
fn trigger_pairs_are_symmetric() {
    let ids: Vec<&str> = rules_of_kind(RuleKind::Trigger)
        .iter()
        .chain(rules_of_kind(RuleKind::If))
        .map(|d| d.id)
        .collect();
    for a in &ids {
        for b in &ids {
            assert_eq!(is_trigger_pair_compatible(a, b), is_trigger_pair_compatible(b, a), "{a} / {b}");
        }
    }
}

#[test]
fn destroyed_forbids_mutating_actions() {
    for action in ["change_x", "move_y", "change_color", "change_size", "morph_into", "destroy"] {
        assert!(!is_action_compatible("destroyed", action), "{action}");
    }
    assert!(is_action_compatible("destroyed", "spawn"));
}

#[test]
fn change_triggers_forbid_self_retrigger() {
    assert!(!is_action_compatible("color_changes", "change_color"));
    assert!(is_action_compatible("color_changes", "change_size"));
    assert!(!is_action_compatible("size_changes", "change_size"));
    assert!(!is_action_compatible("x_changes", "change_x"));
}
