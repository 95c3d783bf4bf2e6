pub mod actions;
pub mod collision;
pub mod shape;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::SlotMap;

use crate::config::EngineConfig;
use crate::events::event::{EventArgs, keys, names};
use crate::events::queue::EventQueue;
use crate::rules::predicates::ArgError;
use collision::CollisionTest;
use shape::{Shape, ShapeId, ShapeKind};

/// What one physics step did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub collisions: usize,
    /// Shapes destroyed for leaving the viewport.
    pub culled: usize,
    /// Shapes destroyed by the population cap.
    pub evicted: usize,
}

/// The shape population plus global gravity.
///
/// Shapes live in a slot map so that handles held by queued events go stale
/// instead of dangling; `order` keeps spawn order for iteration, collision
/// pairing and cap eviction.
pub struct World {
    shapes: SlotMap<ShapeId, Shape>,
    order: Vec<ShapeId>,
    x_gravity: f64,
    y_gravity: f64,
    config: EngineConfig,
    rng: StdRng,
}

impl World {
    pub fn new(config: &EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            shapes: SlotMap::with_key(),
            order: Vec::new(),
            x_gravity: config.default_x_gravity,
            y_gravity: config.default_y_gravity,
            config: config.clone(),
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Live shapes, oldest first.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.order.iter().filter_map(|id| self.shapes.get(*id))
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.order.clone()
    }

    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes().cloned().collect()
    }

    pub fn x_gravity(&self) -> f64 {
        self.x_gravity
    }

    pub fn y_gravity(&self) -> f64 {
        self.y_gravity
    }

    // ── Population ──────────────────────────────────────────────────────

    /// Spawn at a random position inside the viewport, keeping
    /// `spawn_margin` clear of every edge.
    pub fn spawn(&mut self, kind: ShapeKind, queue: &mut EventQueue) -> ShapeId {
        let margin = self.config.spawn_margin;
        let x = self.random_between(margin, self.config.viewport_width - margin);
        let y = self.random_between(margin, self.config.viewport_height - margin);
        self.spawn_at(kind, x, y, queue)
    }

    pub fn spawn_at(&mut self, kind: ShapeKind, x: f64, y: f64, queue: &mut EventQueue) -> ShapeId {
        let shape = Shape {
            id: ShapeId::default(),
            kind,
            x,
            y,
            x_velocity: self.config.default_x_velocity,
            y_velocity: self.config.default_y_velocity,
            size: self.config.spawn_size,
            color: self.config.spawn_color.clone(),
        };
        let id = self.insert(shape);
        self.order.push(id);
        self.announce_spawn(id, queue);
        id
    }

    /// Store `shape` under a fresh id. The caller places the id in `order`.
    fn insert(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert_with_key(|id| Shape { id, ..shape })
    }

    fn announce_spawn(&self, id: ShapeId, queue: &mut EventQueue) {
        if let Some(shape) = self.shapes.get(id) {
            queue.enqueue(names::SPAWN, shape.context());
        }
    }

    fn random_between(&mut self, low: f64, high: f64) -> f64 {
        if low < high { self.rng.gen_range(low..high) } else { low }
    }

    /// Remove a shape and enqueue `destroyed` with its last state. Destroying
    /// a shape that is already gone does nothing and enqueues nothing.
    pub fn destroy(&mut self, id: ShapeId, queue: &mut EventQueue) -> bool {
        let Some(shape) = self.shapes.remove(id) else {
            return false;
        };
        self.order.retain(|other| *other != id);
        queue.enqueue(names::DESTROYED, shape.context());
        true
    }

    /// Replace a shape with one of another kind. The replacement keeps the
    /// old shape's position, velocity, size, color and its place in spawn
    /// order. Enqueues `destroyed` for the old shape, then `spawn` for the new.
    pub fn morph(&mut self, id: ShapeId, kind: ShapeKind, queue: &mut EventQueue) -> Option<ShapeId> {
        let slot = self.order.iter().position(|other| *other == id)?;
        let old = self.shapes.remove(id)?;
        queue.enqueue(names::DESTROYED, old.context());

        let new = self.insert(Shape { kind, ..old });
        self.order[slot] = new;
        self.announce_spawn(new, queue);
        Some(new)
    }

    /// Apply `change` to a live shape and enqueue `event` with its new state.
    pub(crate) fn modify(
        &mut self,
        id: ShapeId,
        event: &str,
        queue: &mut EventQueue,
        change: impl FnOnce(&mut Shape),
    ) -> Result<(), ArgError> {
        let shape = self.shapes.get_mut(id).ok_or(ArgError::StaleShape)?;
        change(shape);
        queue.enqueue(event, shape.context());
        Ok(())
    }

    pub fn set_x_gravity(&mut self, gravity: f64, queue: &mut EventQueue) {
        self.x_gravity = gravity;
        queue.enqueue(names::X_GRAVITY_CHANGE, EventArgs::new().with(keys::GRAVITY, gravity));
    }

    pub fn set_y_gravity(&mut self, gravity: f64, queue: &mut EventQueue) {
        self.y_gravity = gravity;
        queue.enqueue(names::Y_GRAVITY_CHANGE, EventArgs::new().with(keys::GRAVITY, gravity));
    }

    // ── Physics ─────────────────────────────────────────────────────────

    /// One physics step: integrate, report collisions, cull shapes outside
    /// the viewport, then enforce the population cap.
    ///
    /// Gravity is a constant offset subtracted every step, not an
    /// acceleration.
    pub fn step(&mut self, collision: &dyn CollisionTest, queue: &mut EventQueue) -> StepReport {
        let mut report = StepReport::default();

        let (x_gravity, y_gravity) = (self.x_gravity, self.y_gravity);
        for shape in self.shapes.values_mut() {
            shape.x += shape.x_velocity;
            shape.x -= x_gravity;
            shape.y += shape.y_velocity;
            shape.y -= y_gravity;
        }

        for (i, a) in self.order.iter().enumerate() {
            for b in &self.order[i + 1..] {
                let (Some(a), Some(b)) = (self.shapes.get(*a), self.shapes.get(*b)) else {
                    continue;
                };
                if collision.collides(a, b) {
                    let args = a
                        .context()
                        .with(keys::EVENT_A_TYPE, a.kind.name())
                        .with(keys::EVENT_B_TYPE, b.kind.name())
                        .with(keys::OTHER_SHAPE, b.id)
                        .with(keys::OTHER_SHAPE_X, b.x)
                        .with(keys::OTHER_SHAPE_Y, b.y)
                        .with(keys::OTHER_SHAPE_SIZE, b.size);
                    queue.enqueue(names::COLLISION, args);
                    report.collisions += 1;
                }
            }
        }

        let (width, height) = (self.config.viewport_width, self.config.viewport_height);
        let outside: Vec<ShapeId> = self
            .shapes()
            .filter(|s| !(0.0..=width).contains(&s.x) || !(0.0..=height).contains(&s.y))
            .map(|s| s.id)
            .collect();
        for id in outside {
            if self.destroy(id, queue) {
                report.culled += 1;
            }
        }

        while !self.order.is_empty() && self.order.len() >= self.config.max_shapes {
            let oldest = self.order[0];
            if self.destroy(oldest, queue) {
                report.evicted += 1;
            } else {
                self.order.remove(0);
            }
        }

        if report.collisions + report.culled + report.evicted > 0 {
            tracing::debug!(
                "step: {} collision(s), {} culled, {} evicted, {} alive",
                report.collisions,
                report.culled,
                report.evicted,
                self.order.len()
            );
        }
        report
    }
}
