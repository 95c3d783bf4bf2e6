use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::events::event::{EventArgs, keys};

new_key_type! {
    /// Handle to a live shape. Stale once the shape is destroyed.
    pub struct ShapeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Rectangle, ShapeKind::Circle, ShapeKind::Triangle];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(ShapeKind::Rectangle),
            "circle" => Some(ShapeKind::Circle),
            "triangle" => Some(ShapeKind::Triangle),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned box, `min` inclusive corner to `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Strict overlap: boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x && other.min_x < self.max_x && self.min_y < other.max_y && other.min_y < self.max_y
    }
}

/// One simulated shape. `size` is the radius for circles and the side (or
/// base width) for rectangles and triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub x_velocity: f64,
    pub y_velocity: f64,
    pub size: f64,
    pub color: String,
}

impl Shape {
    /// The shape-scoped context bag attached to shape events and FOR loops.
    pub fn context(&self) -> EventArgs {
        EventArgs::new()
            .with(keys::EVENT_SHAPE_TYPE, self.kind.name())
            .with(keys::SHAPE, self.id)
            .with(keys::SHAPE_X, self.x)
            .with(keys::SHAPE_Y, self.y)
            .with(keys::SHAPE_SIZE, self.size)
            .with(keys::SHAPE_COLOR, self.color.as_str())
    }

    pub fn bounds(&self) -> Bounds {
        match self.kind {
            ShapeKind::Circle => Bounds {
                min_x: self.x - self.size,
                min_y: self.y - self.size,
                max_x: self.x + self.size,
                max_y: self.y + self.size,
            },
            ShapeKind::Rectangle | ShapeKind::Triangle => Bounds {
                min_x: self.x,
                min_y: self.y,
                max_x: self.x + self.size,
                max_y: self.y + self.size,
            },
        }
    }
}
