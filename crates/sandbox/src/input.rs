//! Scripted input: a JSON list of events to inject at given ticks, standing
//! in for live mouse and keyboard capture.
//!
//! ```json
//! [
//!   { "tick": 0, "event": "on_left_click", "args": { "mouse_x": 120, "mouse_y": 80 } },
//!   { "tick": 4, "event": "on_input", "args": { "event_key": "w" } }
//! ]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chaos_engine::EventArgs;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Zero-based tick before which the event is queued.
    pub tick: u64,
    pub event: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl ScriptedInput {
    pub fn new(tick: u64, event: impl Into<String>) -> Self {
        Self {
            tick,
            event: event.into(),
            args: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Numbers and booleans become numeric values, strings become text.
    /// Anything else is dropped.
    pub fn event_args(&self) -> EventArgs {
        let mut args = EventArgs::new();
        for (key, value) in &self.args {
            match value {
                Value::Number(n) => match n.as_f64() {
                    Some(n) => args.insert(key, n),
                    None => tracing::debug!("Dropping out-of-range number for `{}`", key),
                },
                Value::Bool(b) => args.insert(key, if *b { 1.0 } else { 0.0 }),
                Value::String(s) => args.insert(key, s.as_str()),
                other => tracing::debug!("Dropping non-scalar input arg `{}`: {}", key, other),
            }
        }
        args
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    inputs: Vec<ScriptedInput>,
}

impl InputScript {
    pub fn new(inputs: Vec<ScriptedInput>) -> Self {
        Self { inputs }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading inputs {}", path.display()))?;
        let script: Self =
            serde_json::from_str(&text).with_context(|| format!("parsing inputs {}", path.display()))?;
        tracing::info!("Loaded {} scripted input(s) from {}", script.len(), path.display());
        Ok(script)
    }

    /// Inputs due before `tick`, in file order.
    pub fn at(&self, tick: u64) -> impl Iterator<Item = &ScriptedInput> {
        self.inputs.iter().filter(move |input| input.tick == tick)
    }

    pub fn last_tick(&self) -> Option<u64> {
        self.inputs.iter().map(|input| input.tick).max()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
