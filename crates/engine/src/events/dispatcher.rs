use super::eval::execute;
use super::event::keys;
use super::queue::EventQueue;
use crate::blocks::Forest;
use crate::rules::RuleKind;
use crate::world::World;

/// Outcome of one [`Dispatcher::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Events popped from the queue.
    pub events: usize,
    /// Ruleset evaluations across all popped events.
    pub rulesets_run: usize,
    /// The per-tick cap was hit with events still pending.
    pub overrun: bool,
    /// Events left queued for the next drain after an overrun.
    pub backlog: usize,
    /// Newest leftover events discarded to keep the backlog bounded.
    pub dropped: usize,
}

/// Pops events in FIFO order and runs every ruleset whose trigger listens
/// for them, until the queue is empty or the per-tick cap is reached.
///
/// Events left over by an overrun stay queued for the next drain, oldest
/// first, up to `max_backlog`; anything newer is dropped.
pub struct Dispatcher {
    pub max_events_per_tick: usize,
    pub max_backlog: usize,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_limits(10_000, 1_000)
    }

    pub fn with_limits(max_events_per_tick: usize, max_backlog: usize) -> Self {
        Self {
            max_events_per_tick,
            max_backlog,
        }
    }

    pub fn drain(&self, forest: &Forest, world: &mut World, queue: &mut EventQueue) -> DrainReport {
        let mut report = DrainReport::default();

        while !queue.is_empty() {
            if report.events >= self.max_events_per_tick {
                report.overrun = true;
                report.dropped = queue.len().saturating_sub(self.max_backlog);
                queue.truncate(self.max_backlog);
                report.backlog = queue.len();
                tracing::warn!(
                    "event cascade overrun: {} events dispatched this tick, {} carried over, {} dropped",
                    report.events,
                    report.backlog,
                    report.dropped
                );
                break;
            }
            let Some(event) = queue.pop() else {
                break;
            };
            report.events += 1;

            let mut ctx = event.args;
            ctx.insert(keys::EVENT, event.name.as_str());

            let mut matched = 0;
            for root in forest.roots() {
                let Some(node) = forest.node(root) else {
                    continue;
                };
                let def = node.def();
                if def.kind == RuleKind::Trigger && def.trigger == Some(event.name.as_str()) {
                    execute(forest, root, &ctx, world, queue);
                    matched += 1;
                }
            }
            report.rulesets_run += matched;
            tracing::debug!("dispatched {} to {} ruleset(s)", event.name, matched);
        }

        report
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
