//! Lock-free tick counters.
//!
//! The tick loop updates these with relaxed atomics; `--stats` reads a
//! snapshot once the run ends.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::{Duration, Instant};

use chaos_engine::TickReport;

pub struct Metrics {
    // Monotonic counters
    ticks: AtomicU64,
    events_dispatched: AtomicU64,
    rulesets_run: AtomicU64,
    overruns: AtomicU64,
    events_dropped: AtomicU64,
    collisions: AtomicU64,
    culled: AtomicU64,
    evicted: AtomicU64,
    tick_ns_sum: AtomicU64,

    // Tick duration histogram buckets
    hist_under_100us: AtomicU64,
    hist_100us_1ms: AtomicU64,
    hist_1_4ms: AtomicU64,
    hist_4_16ms: AtomicU64,
    hist_over_16ms: AtomicU64,

    started_at: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            events_dispatched: AtomicU64::new(0),
            rulesets_run: AtomicU64::new(0),
            overruns: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            collisions: AtomicU64::new(0),
            culled: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            tick_ns_sum: AtomicU64::new(0),
            hist_under_100us: AtomicU64::new(0),
            hist_100us_1ms: AtomicU64::new(0),
            hist_1_4ms: AtomicU64::new(0),
            hist_4_16ms: AtomicU64::new(0),
            hist_over_16ms: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Called once after every `Engine::tick`.
    pub fn record_tick(&self, report: &TickReport, duration: Duration) {
        self.ticks.fetch_add(1, Relaxed);
        self.events_dispatched.fetch_add(report.drain.events as u64, Relaxed);
        self.rulesets_run.fetch_add(report.drain.rulesets_run as u64, Relaxed);
        if report.drain.overrun {
            self.overruns.fetch_add(1, Relaxed);
            self.events_dropped.fetch_add(report.drain.dropped as u64, Relaxed);
        }
        self.collisions.fetch_add(report.step.collisions as u64, Relaxed);
        self.culled.fetch_add(report.step.culled as u64, Relaxed);
        self.evicted.fetch_add(report.step.evicted as u64, Relaxed);
        self.tick_ns_sum.fetch_add(duration.as_nanos() as u64, Relaxed);

        let us = duration.as_micros() as u64;
        let bucket = match us {
            0..=99 => &self.hist_under_100us,
            100..=999 => &self.hist_100us_1ms,
            1_000..=3_999 => &self.hist_1_4ms,
            4_000..=15_999 => &self.hist_4_16ms,
            _ => &self.hist_over_16ms,
        };
        bucket.fetch_add(1, Relaxed);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks.load(Relaxed)
    }

    pub fn snapshot(&self, shapes_alive: u64) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs_f64(),
            ticks: self.ticks.load(Relaxed),
            events_dispatched: self.events_dispatched.load(Relaxed),
            rulesets_run: self.rulesets_run.load(Relaxed),
            overruns: self.overruns.load(Relaxed),
            events_dropped: self.events_dropped.load(Relaxed),
            collisions: self.collisions.load(Relaxed),
            culled: self.culled.load(Relaxed),
            evicted: self.evicted.load(Relaxed),
            tick_ns_sum: self.tick_ns_sum.load(Relaxed),
            shapes_alive,
            hist: [
                self.hist_under_100us.load(Relaxed),
                self.hist_100us_1ms.load(Relaxed),
                self.hist_1_4ms.load(Relaxed),
                self.hist_4_16ms.load(Relaxed),
                self.hist_over_16ms.load(Relaxed),
            ],
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub ticks: u64,
    pub events_dispatched: u64,
    pub rulesets_run: u64,
    pub overruns: u64,
    pub events_dropped: u64,
    pub collisions: u64,
    pub culled: u64,
    pub evicted: u64,
    pub tick_ns_sum: u64,
    pub shapes_alive: u64,
    /// `[<100μs, 100μs-1ms, 1-4ms, 4-16ms, >16ms]`
    pub hist: [u64; 5],
}
