//! The tick loop.
//!
//! [`run`] paces ticks on a tokio interval and stops after the configured
//! tick count or on Ctrl+C. [`run_headless`] runs the same ticks back to back,
//! for tests and the demo.

use std::time::Instant;

use chaos_engine::{Engine, TickReport};
use tokio::time::MissedTickBehavior;

use crate::input::InputScript;
use crate::metrics::Metrics;
use crate::settings::SimulationSettings;

/// Queue the inputs scripted for the upcoming tick, then run it.
pub fn run_tick(engine: &mut Engine, script: &InputScript, metrics: &Metrics) -> TickReport {
    let tick = engine.ticks();
    for input in script.at(tick) {
        tracing::debug!("tick {}: injecting {}", tick, input.event);
        engine.enqueue_event(&input.event, input.event_args());
    }

    let started = Instant::now();
    let report = engine.tick();
    metrics.record_tick(&report, started.elapsed());
    report
}

pub fn run_headless(engine: &mut Engine, script: &InputScript, metrics: &Metrics, ticks: u64) {
    for _ in 0..ticks {
        run_tick(engine, script, metrics);
    }
}

/// Returns the number of ticks run.
pub async fn run(
    engine: &mut Engine,
    script: &InputScript,
    metrics: &Metrics,
    settings: &SimulationSettings,
) -> u64 {
    let mut interval = tokio::time::interval(settings.tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tracing::info!(
        "Simulation started at {} Hz ({})",
        settings.tick_rate_hz,
        match settings.ticks {
            Some(n) => format!("{n} ticks"),
            None => "until Ctrl+C".to_string(),
        }
    );

    let started_at = engine.ticks();
    loop {
        let done = engine.ticks() - started_at;
        if settings.ticks.is_some_and(|limit| done >= limit) {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                run_tick(engine, script, metrics);
            }
            _ = &mut ctrl_c => {
                tracing::info!("Ctrl+C received, stopping...");
                break;
            }
        }
    }

    engine.ticks() - started_at
}
