use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chaos_engine::Engine;
use chaos_sandbox::input::InputScript;
use chaos_sandbox::metrics::Metrics;
use chaos_sandbox::settings::Settings;
use chaos_sandbox::{demo, persistence, simulation};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn flag_value(flag: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != flag).nth(1)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|a| a == flag)
}

async fn run() -> Result<()> {
    let demo_mode = has_flag("--demo");
    let show_stats = has_flag("--stats");
    let project_path: Option<PathBuf> = flag_value("--project").map(Into::into);
    let save_path: Option<PathBuf> = flag_value("--save").map(Into::into);
    let inputs_path: Option<PathBuf> = flag_value("--inputs").map(Into::into);

    let settings = match flag_value("--config") {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };
    let mut sim = settings.simulation.clone();
    if let Some(ticks) = flag_value("--ticks") {
        sim.ticks = Some(ticks.parse().with_context(|| format!("--ticks expects a number, got `{ticks}`"))?);
    }

    tracing::info!("Chaos sandbox -- rule engine host");
    let mut engine = Engine::new(settings.engine.clone());

    if let Some(path) = &project_path {
        persistence::load_project(&mut engine, path)?;
    }
    if demo_mode {
        demo::install(&mut engine).context("installing demo program")?;
        if sim.ticks.is_none() {
            sim.ticks = Some(demo::DEMO_TICKS);
        }
    }
    let script = match &inputs_path {
        Some(path) => InputScript::load(path)?,
        None if demo_mode => demo::script(),
        None => InputScript::default(),
    };

    let metrics = Metrics::new();
    engine.launch();
    let ran = simulation::run(&mut engine, &script, &metrics, &sim).await;
    tracing::info!("Ran {} ticks, {} shape(s) alive", ran, engine.world().len());

    if let Some(path) = &save_path {
        persistence::save_project(&engine, path)?;
    }
    if show_stats {
        let snapshot = metrics.snapshot(engine.world().len() as u64);
        println!("{}", serde_json::to_string_pretty(&snapshot).context("serializing stats")?);
    }
    Ok(())
}
