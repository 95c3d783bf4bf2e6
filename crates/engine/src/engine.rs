//! The facade the editor and host drive: authoring on one side, ticking on
//! the other.

use indexmap::IndexMap;

use crate::blocks::{Block, Forest, Position, RuleNum, VarValue};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::dispatcher::{Dispatcher, DrainReport};
use crate::events::event::{EventArgs, names};
use crate::events::queue::EventQueue;
use crate::project::Project;
use crate::rules::RuleKind;
use crate::world::collision::{BoundingBoxes, CollisionTest};
use crate::world::shape::{Shape, ShapeId, ShapeKind};
use crate::world::{StepReport, World};

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based number of the tick just run.
    pub tick: u64,
    pub drain: DrainReport,
    pub step: StepReport,
}

pub struct Engine {
    config: EngineConfig,
    forest: Forest,
    world: World,
    queue: EventQueue,
    dispatcher: Dispatcher,
    collision: Box<dyn CollisionTest>,
    sprites: IndexMap<String, String>,
    ticks: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            world: World::new(&config),
            dispatcher: Dispatcher::with_limits(config.max_events_per_tick, config.max_backlog),
            config,
            forest: Forest::new(),
            queue: EventQueue::new(),
            collision: Box::new(BoundingBoxes),
            sprites: IndexMap::new(),
            ticks: 0,
        }
    }

    pub fn with_collision(mut self, collision: impl CollisionTest + 'static) -> Self {
        self.collision = Box::new(collision);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // ── Authoring ───────────────────────────────────────────────────────

    pub fn add_rule(&mut self, kind: RuleKind, id: &str) -> Result<Block, EngineError> {
        self.add_rule_at(kind, id, (0.0, 0.0))
    }

    pub fn add_rule_at(&mut self, kind: RuleKind, id: &str, position: Position) -> Result<Block, EngineError> {
        let num = self.forest.create(kind, id, position)?;
        self.forest.block(num).ok_or(EngineError::UnknownBlock(num))
    }

    /// Returns how many blocks were removed with the subtree.
    pub fn delete_rule(&mut self, num: RuleNum) -> Result<usize, EngineError> {
        self.forest.delete(num)
    }

    pub fn reparent_rule(&mut self, num: RuleNum, parent: Option<RuleNum>) -> Result<(), EngineError> {
        self.forest.reparent(num, parent)
    }

    pub fn change_rule_id(&mut self, num: RuleNum, new_id: &str) -> Result<(), EngineError> {
        self.forest.change_rule_id(num, new_id)
    }

    pub fn edit_var(&mut self, num: RuleNum, index: usize, value: impl Into<VarValue>) -> Result<(), EngineError> {
        self.forest.edit_var(num, index, value.into())
    }

    pub fn move_rule(&mut self, num: RuleNum, position: Position) -> Result<(), EngineError> {
        self.forest.move_block(num, position)
    }

    /// Nested snapshot of every ruleset in dispatch order.
    pub fn forest(&self) -> IndexMap<RuleNum, Block> {
        self.forest.snapshot()
    }

    pub fn blocks(&self) -> &Forest {
        &self.forest
    }

    // ── Runtime ─────────────────────────────────────────────────────────

    /// Queue an external event (input, host signal) for the next drain.
    pub fn enqueue_event(&mut self, name: &str, args: EventArgs) {
        self.queue.enqueue(name, args);
    }

    /// Queue the one-off `game_launch` event that `start` rulesets listen for.
    pub fn launch(&mut self) {
        tracing::info!("launching with {} ruleset(s)", self.forest.roots().count());
        self.queue.enqueue(names::GAME_LAUNCH, EventArgs::new());
    }

    /// Drain the queue without advancing physics.
    pub fn drain(&mut self) -> DrainReport {
        self.dispatcher.drain(&self.forest, &mut self.world, &mut self.queue)
    }

    /// One simulation tick: queue `every_update`, drain, then step the world.
    /// Events raised by the step wait for the next tick.
    pub fn tick(&mut self) -> TickReport {
        self.queue.enqueue(names::EVERY_UPDATE, EventArgs::new());
        let drain = self.drain();
        let step = self.world.step(self.collision.as_ref(), &mut self.queue);
        self.ticks += 1;
        TickReport {
            tick: self.ticks,
            drain,
            step,
        }
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.world.snapshot()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Place a shape directly. Its `spawn` event is queued like any other.
    pub fn spawn_shape_at(&mut self, kind: ShapeKind, x: f64, y: f64) -> ShapeId {
        self.world.spawn_at(kind, x, y, &mut self.queue)
    }

    pub fn pending_events(&self) -> &EventQueue {
        &self.queue
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn project(&self) -> Project {
        Project {
            rulesets: self.forest.snapshot(),
            sprites: self.sprites.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String, EngineError> {
        self.project().to_json()
    }

    /// Replace the forest and sprite table. On error nothing changes.
    pub fn import_project(&mut self, project: Project) -> Result<(), EngineError> {
        let mut forest = Forest::from_snapshot(&project.rulesets)?;
        forest.advance_rule_nums_to(self.forest.next_rule_num());
        tracing::info!(
            "imported {} ruleset(s), {} block(s), next rule number {}",
            project.rulesets.len(),
            forest.len(),
            forest.next_rule_num()
        );
        self.forest = forest;
        self.sprites = project.sprites;
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<(), EngineError> {
        self.import_project(Project::from_json(text)?)
    }

    pub fn sprites(&self) -> &IndexMap<String, String> {
        &self.sprites
    }

    pub fn set_sprite(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.sprites.insert(name.into(), path.into());
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
