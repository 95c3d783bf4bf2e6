//! Headless host for the chaos rule engine.
//!
//! Stands in for the window and input layers: loads settings and project
//! files, replays scripted input, paces ticks and keeps counters.

pub mod demo;
pub mod input;
pub mod metrics;
pub mod persistence;
pub mod settings;
pub mod simulation;
