//! Authored rule blocks.
//!
//! The live forest is an arena keyed by [`RuleNum`] (see [`forest`]); the
//! nested [`Block`] type is its read-only snapshot and JSON form.

pub mod forest;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::{RuleKind, VarType};

pub use forest::{Forest, Node};

/// Editor canvas coordinates.
pub type Position = (f32, f32);

/// Vertical spacing between a block and each of its variable slots.
pub const VAR_SPACING: f32 = 30.0;

/// Unique, monotonically allocated block identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleNum(pub u64);

impl fmt::Display for RuleNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bound variable value: a number (ranges) or text (option lists).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    Number(f64),
    Text(String),
}

impl VarValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VarValue::Number(n) => Some(*n),
            VarValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VarValue::Text(text) => Some(text),
            VarValue::Number(_) => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Number(n) => write!(f, "{n}"),
            VarValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for VarValue {
    fn from(n: f64) -> Self {
        VarValue::Number(n)
    }
}

impl From<&str> for VarValue {
    fn from(text: &str) -> Self {
        VarValue::Text(text.to_string())
    }
}

impl From<String> for VarValue {
    fn from(text: String) -> Self {
        VarValue::Text(text)
    }
}

/// One user-configurable slot of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarBlock {
    pub position: Position,
    pub label: String,
    pub var_type: VarType,
    pub owner_rule_num: RuleNum,
    pub value: VarValue,
}

impl VarBlock {
    pub fn new(owner: RuleNum, index: usize, var_type: VarType, value: VarValue, anchor: Position) -> Self {
        Self {
            position: var_position(anchor, index),
            label: var_label(index, &value),
            var_type,
            owner_rule_num: owner,
            value,
        }
    }
}

pub(crate) fn var_position(anchor: Position, index: usize) -> Position {
    (anchor.0, anchor.1 - VAR_SPACING * (index as f32 + 1.0))
}

pub(crate) fn var_label(index: usize, value: &VarValue) -> String {
    let name = crate::rules::VAR_NAMES.get(index).copied().unwrap_or("?");
    format!("{name}: {value}")
}

/// Snapshot of one block and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub position: Position,
    pub label: String,
    pub rule_kind: RuleKind,
    pub rule_id: String,
    pub rule_num: RuleNum,
    pub vars: Vec<VarBlock>,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    /// Number of blocks in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Block::subtree_len).sum::<usize>()
    }

    pub fn values(&self) -> Vec<VarValue> {
        self.vars.iter().map(|v| v.value.clone()).collect()
    }

    /// Depth-first search of this subtree.
    pub fn find(&self, num: RuleNum) -> Option<&Block> {
        if self.rule_num == num {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(num))
    }
}
