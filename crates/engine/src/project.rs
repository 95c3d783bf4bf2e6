//! The JSON project file: `{ "rulesets": { "<ruleNum>": Block, .. }, "sprites": { .. } }`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::blocks::{Block, RuleNum};
use crate::error::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub rulesets: IndexMap<RuleNum, Block>,
    /// Asset bindings, sprite name to path.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub sprites: IndexMap<String, String>,
}

impl Project {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, EngineError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| EngineError::InvalidFile(format!("not valid JSON: {err}")))?;
        match value.get("rulesets") {
            Some(rulesets) if rulesets.is_object() => {}
            Some(_) => return Err(EngineError::InvalidFile("`rulesets` must be an object".into())),
            None => return Err(EngineError::InvalidFile("missing `rulesets`".into())),
        }
        serde_json::from_value(value).map_err(|err| EngineError::InvalidFile(err.to_string()))
    }
}
