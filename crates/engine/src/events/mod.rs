//! Event plumbing: the argument bag, the FIFO queue, the per-tick dispatcher
//! and the recursive tree evaluator it drives.

pub mod dispatcher;
pub mod eval;
pub mod event;
pub mod queue;

pub use dispatcher::{Dispatcher, DrainReport};
pub use event::{Context, Event, EventArgs, Value};
pub use queue::EventQueue;
