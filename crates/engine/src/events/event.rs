use std::collections::BTreeMap;
use std::fmt;

use crate::blocks::VarValue;
use crate::world::shape::ShapeId;

/// Well-known event names.
pub mod names {
    pub const GAME_LAUNCH: &str = "game_launch";
    pub const EVERY_UPDATE: &str = "every_update";
    pub const LEFT_CLICK: &str = "on_left_click";
    pub const RIGHT_CLICK: &str = "on_right_click";
    pub const MOUSE_MOVE: &str = "on_mouse_move";
    pub const INPUT: &str = "on_input";
    pub const SPAWN: &str = "spawn";
    pub const DESTROYED: &str = "destroyed";
    pub const COLLISION: &str = "collision";
    pub const X_CHANGE: &str = "x_change";
    pub const Y_CHANGE: &str = "y_change";
    pub const X_VELOCITY_CHANGE: &str = "x_velocity_change";
    pub const Y_VELOCITY_CHANGE: &str = "y_velocity_change";
    pub const COLOR_CHANGE: &str = "color_change";
    pub const SIZE_CHANGE: &str = "size_change";
    pub const X_GRAVITY_CHANGE: &str = "x_gravity_change";
    pub const Y_GRAVITY_CHANGE: &str = "y_gravity_change";
}

/// Well-known context keys.
pub mod keys {
    pub const EVENT: &str = "event";
    pub const EVENT_SHAPE_TYPE: &str = "event_shape_type";
    pub const SHAPE: &str = "shape";
    pub const SHAPE_X: &str = "shape_x";
    pub const SHAPE_Y: &str = "shape_y";
    pub const SHAPE_SIZE: &str = "shape_size";
    pub const SHAPE_COLOR: &str = "shape_color";
    pub const OTHER_SHAPE: &str = "other_shape";
    pub const OTHER_SHAPE_X: &str = "other_shape_x";
    pub const OTHER_SHAPE_Y: &str = "other_shape_y";
    pub const OTHER_SHAPE_SIZE: &str = "other_shape_size";
    pub const EVENT_A_TYPE: &str = "event_a_type";
    pub const EVENT_B_TYPE: &str = "event_b_type";
    pub const EVENT_KEY: &str = "event_key";
    pub const MOUSE_X: &str = "mouse_x";
    pub const MOUSE_Y: &str = "mouse_y";
    pub const GRAVITY: &str = "gravity";
}

/// An ambient value carried by an event or bound to a block argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Shape(ShapeId),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<ShapeId> {
        match self {
            Value::Shape(id) => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
            Value::Shape(id) => write!(f, "{id:?}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<ShapeId> for Value {
    fn from(id: ShapeId) -> Self {
        Value::Shape(id)
    }
}

impl From<VarValue> for Value {
    fn from(value: VarValue) -> Self {
        match value {
            VarValue::Number(n) => Value::Number(n),
            VarValue::Text(text) => Value::Text(text),
        }
    }
}

/// The event-argument bag. Also the evaluation context handed down a ruleset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventArgs {
    values: BTreeMap<String, Value>,
}

pub type Context = EventArgs;

impl EventArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_text)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    pub fn shape(&self, key: &str) -> Option<ShapeId> {
        self.get(key).and_then(Value::as_shape)
    }

    /// Overwrite with every entry of `other`.
    pub fn extend(&mut self, other: &EventArgs) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A named occurrence waiting in the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub args: EventArgs,
}

impl Event {
    pub fn new(name: impl Into<String>, args: EventArgs) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self::new(name, EventArgs::new())
    }
}
