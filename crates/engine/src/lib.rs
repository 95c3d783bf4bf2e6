//! Rule-block interpreter for a 2D shape sandbox.
//!
//! Authors compose programs out of TRIGGER / IF / FOR / DO blocks. Each tick the
//! engine drains a FIFO event queue, walks every ruleset whose trigger matches
//! the popped event, and lets DO actions mutate the shape population -- which
//! may enqueue further events that are drained within the same tick.

pub mod blocks;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod project;
pub mod rules;
pub mod world;

pub use blocks::{Block, Position, RuleNum, VarBlock, VarValue};
pub use config::EngineConfig;
pub use engine::{Engine, TickReport};
pub use error::EngineError;
pub use events::event::{Event, EventArgs, Value};
pub use project::Project;
pub use rules::{RuleKind, VarType};
pub use world::shape::{Shape, ShapeId, ShapeKind};
