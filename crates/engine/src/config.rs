use serde::{Deserialize, Serialize};

/// Simulation parameters. Missing fields fall back to the defaults below,
/// which mirror the sandbox's "Game" settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_x_velocity: f64,
    pub default_y_velocity: f64,
    pub default_x_gravity: f64,
    pub default_y_gravity: f64,
    /// Population cap. Once the live count reaches it, the oldest shapes are
    /// destroyed at the end of the tick until the count is below it again.
    pub max_shapes: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Distance from the viewport edges that random spawns keep clear of.
    pub spawn_margin: f64,
    pub spawn_size: f64,
    pub spawn_color: String,
    /// Safety cap on events dispatched in one tick.
    pub max_events_per_tick: usize,
    /// Events an overrun may leave queued for the next tick. Newer events
    /// beyond this are dropped. Keep it below `max_events_per_tick` so fresh
    /// input still gets dispatched.
    pub max_backlog: usize,
    /// Seed for spawn positions. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_x_velocity: 0.0,
            default_y_velocity: 0.0,
            default_x_gravity: 0.0,
            default_y_gravity: 5.0,
            max_shapes: 120,
            viewport_width: 1920.0,
            viewport_height: 1080.0,
            spawn_margin: 100.0,
            spawn_size: 10.0,
            spawn_color: "WHITE".into(),
            max_events_per_tick: 10_000,
            max_backlog: 1_000,
            seed: None,
        }
    }
}
