use std::collections::VecDeque;

use super::event::{Event, EventArgs};

/// Strict FIFO of pending events. Actions push to the tail while the
/// dispatcher pops from the head, so cascades drain in the same tick.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, name: impl Into<String>, args: EventArgs) {
        self.events.push_back(Event::new(name, args));
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Pending events with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name == name).count()
    }

    /// Keep the `len` oldest events, dropping the rest.
    pub fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
