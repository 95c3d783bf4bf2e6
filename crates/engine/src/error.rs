use thiserror::Error;

use crate::blocks::RuleNum;
use crate::rules::{RuleKind, VarType};

/// Authoring and import failures. Every operation that returns one of these
/// leaves the forest exactly as it was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown {kind} rule `{id}`")]
    UnknownRule { kind: RuleKind, id: String },

    #[error("rule numbers are exhausted")]
    RuleNumsExhausted,

    #[error("no block with rule number {0}")]
    UnknownBlock(RuleNum),

    #[error("moving block {child} under {parent} would make it its own descendant")]
    Cycle { child: RuleNum, parent: RuleNum },

    #[error("block {child} cannot be placed under {parent}: {reason}")]
    InvalidPlacement {
        child: RuleNum,
        parent: RuleNum,
        reason: String,
    },

    #[error("block {child} is not compatible with its place under {parent}: {reason}")]
    Incompatible {
        child: RuleNum,
        parent: RuleNum,
        reason: String,
    },

    #[error("block {rule_num} has no variable slot {index}")]
    VarIndex { rule_num: RuleNum, index: usize },

    #[error("`{value}` is not a valid {var_type} value")]
    InvalidVarValue { var_type: VarType, value: String },

    #[error("invalid project file: {0}")]
    InvalidFile(String),

    #[error("failed to serialize project: {0}")]
    Serialize(#[from] serde_json::Error),
}
