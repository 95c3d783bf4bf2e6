//! Static compatibility tables consulted when blocks are nested.
//!
//! Trigger/IF pairs are symmetric and stored in sorted order. Trigger/action
//! pairs are ordered: `(event rule, action rule)`.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Rules whose events carry per-shape state that `spawns`, `destroyed`, `start`
/// and `every_update` can never co-occur with.
const SHAPE_CHANGES: &[&str] = &[
    "collides",
    "x_velocity_changes",
    "y_velocity_changes",
    "x_gravity_changes",
    "y_gravity_changes",
    "color_changes",
    "size_changes",
    "x_changes",
    "y_changes",
];

/// `(rule, [incompatible rules])`, expanded symmetrically below.
const PAIR_ROWS: &[(&str, &[&str])] = &[
    ("spawns", &["destroyed"]),
    ("spawns", SHAPE_CHANGES),
    ("destroyed", SHAPE_CHANGES),
    ("every_update", &["spawns", "destroyed", "start"]),
    ("every_update", SHAPE_CHANGES),
    ("start", &["spawns", "destroyed"]),
    ("start", SHAPE_CHANGES),
];

const ACTION_ROWS: &[(&str, &[&str])] = &[
    (
        "destroyed",
        &[
            "change_x",
            "change_y",
            "move_x",
            "move_y",
            "change_x_velocity",
            "change_y_velocity",
            "change_x_gravity",
            "change_y_gravity",
            "change_color",
            "change_size",
            "morph_into",
            "destroy",
        ],
    ),
    ("x_velocity_changes", &["change_x_velocity"]),
    ("y_velocity_changes", &["change_y_velocity"]),
    ("color_changes", &["change_color"]),
    ("size_changes", &["change_size"]),
    ("start", &["change_x_gravity", "change_y_gravity"]),
    ("x_changes", &["change_x", "move_x"]),
    ("y_changes", &["change_y", "move_y"]),
];

fn sorted<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

static INCOMPATIBLE_PAIRS: LazyLock<HashSet<(&'static str, &'static str)>> = LazyLock::new(|| {
    PAIR_ROWS
        .iter()
        .flat_map(|(rule, others)| others.iter().map(move |other| sorted(*rule, *other)))
        .collect()
});

static INCOMPATIBLE_ACTIONS: LazyLock<HashSet<(&'static str, &'static str)>> = LazyLock::new(|| {
    ACTION_ROWS
        .iter()
        .flat_map(|(rule, actions)| actions.iter().map(move |action| (*rule, *action)))
        .collect()
});

/// Whether two TRIGGER/IF rule ids may appear on the same ancestor chain.
pub fn is_trigger_pair_compatible(a: &str, b: &str) -> bool {
    !INCOMPATIBLE_PAIRS.contains(&sorted(a, b))
}

/// Whether DO rule `action` may run beneath TRIGGER/IF rule `trigger`.
pub fn is_action_compatible(trigger: &str, action: &str) -> bool {
    !INCOMPATIBLE_ACTIONS.contains(&(trigger, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_table_is_symmetric() {
        assert!(!is_trigger_pair_compatible("spawns", "collides"));
        assert!(!is_trigger_pair_compatible("collides", "spawns"));
        assert!(!is_trigger_pair_compatible("every_update", "start"));
        assert!(!is_trigger_pair_compatible("start", "every_update"));
    }

    #[test]
    fn unrelated_pairs_are_compatible() {
        assert!(is_trigger_pair_compatible("collides", "collides"));
        assert!(is_trigger_pair_compatible("on_left_click", "key_pressed"));
        assert!(is_trigger_pair_compatible("color_changes", "color_changes"));
    }

    #[test]
    fn action_table_is_ordered() {
        assert!(!is_action_compatible("destroyed", "change_color"));
        assert!(is_action_compatible("change_color", "destroyed"));
        assert!(!is_action_compatible("x_changes", "move_x"));
        assert!(is_action_compatible("y_changes", "move_x"));
    }
}
