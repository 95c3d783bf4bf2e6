//! The rule catalog: a static registry of TRIGGER, IF, FOR and DO rule kinds.
//!
//! A [`RuleDefinition`] is pure data: a description template, the variable
//! slots the author fills in, the context variables the evaluator pulls out of
//! the active event, and (for IF / DO) the typed handler that runs. Nothing in
//! here holds state, so lookups are safe from any thread.

pub mod catalog;
pub mod compat;
pub mod predicates;

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::blocks::VarValue;
use crate::error::EngineError;
use crate::world::actions::{ActionFn, ActionKind};
use predicates::PredicateFn;

/// Placeholder names used by description templates, one per user variable slot.
pub const VAR_NAMES: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Trigger,
    If,
    For,
    Do,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [RuleKind::Trigger, RuleKind::If, RuleKind::For, RuleKind::Do];

    pub const fn name(self) -> &'static str {
        match self {
            RuleKind::Trigger => "trigger",
            RuleKind::If => "if",
            RuleKind::For => "for",
            RuleKind::Do => "do",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The type of a user-configurable variable slot.
///
/// Serialized (and matched against context variable names during argument
/// binding) by [`VarType::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarType {
    ShapeType,
    TargetType,
    #[serde(rename = "variable")]
    NumericRange,
    Color,
    Size,
    KeyInput,
    Comparison,
}

/// The values a [`VarType`] accepts: a fixed option list (dropdown) or an
/// inclusive numeric range (slider).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarDomain {
    Options(&'static [&'static str]),
    Range { min: f64, max: f64 },
}

impl VarType {
    pub const fn name(self) -> &'static str {
        match self {
            VarType::ShapeType => "shape_type",
            VarType::TargetType => "target_type",
            VarType::NumericRange => "variable",
            VarType::Color => "color",
            VarType::Size => "size",
            VarType::KeyInput => "key_input",
            VarType::Comparison => "comparison",
        }
    }

    pub const fn domain(self) -> VarDomain {
        match self {
            VarType::ShapeType | VarType::TargetType => VarDomain::Options(catalog::SHAPES),
            VarType::NumericRange => VarDomain::Range {
                min: -700.0,
                max: 700.0,
            },
            VarType::Color => VarDomain::Options(catalog::COLORS),
            VarType::Size => VarDomain::Range {
                min: 1.0,
                max: 200.0,
            },
            VarType::KeyInput => VarDomain::Options(catalog::ALLOWED_INPUT),
            VarType::Comparison => VarDomain::Options(catalog::COMPARISONS),
        }
    }

    pub fn default_value(self) -> VarValue {
        match self {
            VarType::ShapeType => VarValue::from("rectangle"),
            VarType::TargetType => VarValue::from("circle"),
            VarType::NumericRange => VarValue::Number(0.0),
            VarType::Color => VarValue::from("WHITE"),
            VarType::Size => VarValue::Number(10.0),
            VarType::KeyInput => VarValue::from("a"),
            VarType::Comparison => VarValue::from(">"),
        }
    }

    /// Check `value` against this type's domain. Numeric text is accepted for
    /// range types and normalized to a number.
    pub fn coerce(self, value: VarValue) -> Result<VarValue, EngineError> {
        let reject = |value: &VarValue| EngineError::InvalidVarValue {
            var_type: self,
            value: value.to_string(),
        };
        match (self.domain(), &value) {
            (VarDomain::Options(options), VarValue::Text(text)) if options.contains(&text.as_str()) => {
                Ok(value)
            }
            (VarDomain::Range { min, max }, _) => {
                let number = match &value {
                    VarValue::Number(n) => Some(*n),
                    VarValue::Text(text) => text.trim().parse::<f64>().ok(),
                };
                match number {
                    Some(n) if n.is_finite() && (min..=max).contains(&n) => Ok(VarValue::Number(n)),
                    _ => Err(reject(&value)),
                }
            }
            _ => Err(reject(&value)),
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a DO action touches one bound shape or the simulation as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTarget {
    Global,
    PerShape,
}

/// A DO rule's action, resolved to its handler when the catalog is built.
#[derive(Clone, Copy)]
pub struct ActionBinding {
    pub target: ActionTarget,
    pub kind: ActionKind,
    pub handler: ActionFn,
}

impl ActionBinding {
    pub const fn new(target: ActionTarget, kind: ActionKind) -> Self {
        Self {
            target,
            kind,
            handler: kind.handler(),
        }
    }
}

impl fmt::Debug for ActionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionBinding")
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish()
    }
}

/// One catalog entry.
pub struct RuleDefinition {
    pub id: &'static str,
    pub kind: RuleKind,
    /// Template with `{a}`, `{b}`, ... placeholders for `user_vars[0..]`.
    pub description: &'static str,
    pub user_vars: &'static [VarType],
    /// Names read from the event-argument bag. Entries that coincide with a
    /// user variable name are supplied by the author instead.
    pub context_vars: &'static [&'static str],
    /// Event name a TRIGGER listens for.
    pub trigger: Option<&'static str>,
    pub predicate: Option<PredicateFn>,
    pub action: Option<ActionBinding>,
    /// Member of PROVIDES_SHAPE: binds a shape context for its descendants.
    pub provides_shape: bool,
    /// Member of NEEDS_SHAPE: only valid below a PROVIDES_SHAPE ancestor.
    pub needs_shape: bool,
}

impl RuleDefinition {
    /// Context variables the evaluator must inject, in declared order, after
    /// dropping any name the author already supplies through `user_vars`.
    pub fn bound_context_vars(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.context_vars
            .iter()
            .copied()
            .filter(|name| !self.user_vars.iter().any(|v| v.name() == *name))
    }

    pub fn default_values(&self) -> Vec<VarValue> {
        self.user_vars.iter().map(|v| v.default_value()).collect()
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDefinition")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("user_vars", &self.user_vars)
            .field("context_vars", &self.context_vars)
            .field("trigger", &self.trigger)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// `kind -> id -> definition`, built once from the static tables.
static CATALOG: LazyLock<HashMap<RuleKind, HashMap<&'static str, &'static RuleDefinition>>> =
    LazyLock::new(|| {
        let mut map: HashMap<RuleKind, HashMap<&'static str, &'static RuleDefinition>> = HashMap::new();
        for kind in RuleKind::ALL {
            let entries = rules_of_kind(kind).iter().map(|def| (def.id, def)).collect();
            map.insert(kind, entries);
        }
        map
    });

/// Every definition of one kind, in catalog order.
pub fn rules_of_kind(kind: RuleKind) -> &'static [RuleDefinition] {
    match kind {
        RuleKind::Trigger => catalog::TRIGGER_RULES,
        RuleKind::If => catalog::IF_RULES,
        RuleKind::For => catalog::FOR_RULES,
        RuleKind::Do => catalog::DO_RULES,
    }
}

pub fn rule_definition(kind: RuleKind, id: &str) -> Result<&'static RuleDefinition, EngineError> {
    CATALOG
        .get(&kind)
        .and_then(|entries| entries.get(id))
        .copied()
        .ok_or_else(|| EngineError::UnknownRule {
            kind,
            id: id.to_string(),
        })
}

/// Fill a definition's template. With `None` each placeholder shows its
/// symbolic name (catalog browsing); with bound values it shows the value.
pub fn render_description(def: &RuleDefinition, values: Option<&[VarValue]>) -> String {
    let mut out = def.description.to_string();
    for (index, name) in VAR_NAMES.iter().enumerate().take(def.user_vars.len()) {
        let replacement = match values.and_then(|v| v.get(index)) {
            Some(value) => value.to_string(),
            None => (*name).to_string(),
        };
        out = out.replace(&format!("{{{name}}}"), &replacement);
    }
    out
}
