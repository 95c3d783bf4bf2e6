//! Host-side behaviour: scripted input conversion, tick pacing and the
//! built-in demo program.

use chaos_engine::events::event::{keys, names};
use chaos_engine::{Engine, EngineConfig, ShapeKind, Value};
use chaos_sandbox::input::{InputScript, ScriptedInput};
use chaos_sandbox::metrics::Metrics;
use chaos_sandbox::settings::SimulationSettings;
use chaos_sandbox::{demo, simulation};

fn seeded() -> EngineConfig {
    EngineConfig {
        seed: Some(42),
        ..EngineConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

#[test]
fn scripted_args_convert_to_event_values() {
    let input = ScriptedInput::new(0, names::INPUT)
        .with_arg(keys::EVENT_KEY, "w")
        .with_arg("mouse_x", 120)
        .with_arg("held", true)
        .with_arg("ignored", serde_json::json!([1, 2]));

    let args = input.event_args();
    assert_eq!(args.text(keys::EVENT_KEY), Some("w"));
    assert_eq!(args.number("mouse_x"), Some(120.0));
    assert_eq!(args.number("held"), Some(1.0));
    assert!(!args.contains("ignored"));
}

#[test]
fn script_parses_from_json_and_groups_by_tick() {
    let text = r#"[
        { "tick": 3, "event": "on_left_click" },
        { "tick": 0, "event": "on_input", "args": { "event_key": "a" } },
        { "tick": 3, "event": "on_input", "args": { "event_key": "b" } }
    ]"#;
    let script: InputScript = serde_json::from_str(text).unwrap();

    assert_eq!(script.len(), 3);
    assert_eq!(script.last_tick(), Some(3));
    let due: Vec<&str> = script.at(3).map(|i| i.event.as_str()).collect();
    assert_eq!(due, vec!["on_left_click", "on_input"]);
    assert_eq!(script.at(1).count(), 0);
}

// ---------------------------------------------------------------------------
// Tick loop
// ---------------------------------------------------------------------------

#[test]
fn scripted_click_is_handled_on_its_tick() {
    let mut engine = Engine::new(seeded());
    demo::install(&mut engine).unwrap();
    let script = InputScript::new(vec![ScriptedInput::new(2, names::LEFT_CLICK)]);
    let metrics = Metrics::new();

    simulation::run_headless(&mut engine, &script, &metrics, 2);
    assert!(engine.world().is_empty());

    let report = simulation::run_tick(&mut engine, &script, &metrics);
    assert_eq!(report.tick, 3);
    assert_eq!(engine.world().len(), 1);
    assert_eq!(engine.shapes()[0].kind, ShapeKind::Circle);
    assert_eq!(metrics.ticks(), 3);
}

#[test]
fn metrics_accumulate_drain_and_step_counts() {
    let mut engine = Engine::new(seeded());
    demo::install(&mut engine).unwrap();
    let metrics = Metrics::new();

    simulation::run_headless(&mut engine, &demo::script(), &metrics, 20);

    let snapshot = metrics.snapshot(engine.world().len() as u64);
    assert_eq!(snapshot.ticks, 20);
    assert_eq!(snapshot.hist.iter().sum::<u64>(), 20);
    // every_update alone dispatches once per tick
    assert!(snapshot.events_dispatched >= 20);
    assert!(snapshot.rulesets_run >= 20);
    assert_eq!(snapshot.shapes_alive, 3);
}

#[tokio::test]
async fn paced_run_stops_at_tick_limit() {
    let mut engine = Engine::new(seeded());
    let metrics = Metrics::new();
    let settings = SimulationSettings {
        tick_rate_hz: 1000,
        ticks: Some(5),
    };

    let ran = simulation::run(&mut engine, &InputScript::default(), &metrics, &settings).await;
    assert_eq!(ran, 5);
    assert_eq!(engine.ticks(), 5);
    assert_eq!(metrics.ticks(), 5);
}

// ---------------------------------------------------------------------------
// Demo program
// ---------------------------------------------------------------------------

#[test]
fn demo_installs_three_well_formed_rulesets() {
    let mut engine = Engine::new(seeded());
    let roots = demo::install(&mut engine).unwrap();

    assert_eq!(roots.len(), 3);
    assert_eq!(engine.blocks().len(), 9);
    assert!(engine.blocks().check_integrity().is_ok());
    let forest = engine.forest();
    let order: Vec<_> = forest.keys().copied().collect();
    assert_eq!(order, roots);
}

#[test]
fn high_circle_turns_red_then_grows_in_one_tick() {
    let mut engine = Engine::new(seeded());
    demo::install(&mut engine).unwrap();
    let id = engine.spawn_shape_at(ShapeKind::Circle, 500.0, 150.0);
    let low = engine.spawn_shape_at(ShapeKind::Circle, 500.0, 700.0);

    engine.tick();

    let high = engine.world().shape(id).unwrap();
    assert_eq!(high.color, "RED");
    assert_eq!(high.size, 30.0);
    let low = engine.world().shape(low).unwrap();
    assert_eq!(low.color, "WHITE");
    assert_eq!(low.size, 10.0);
}

#[test]
fn demo_clicks_rise_turn_red_and_leave_the_screen() {
    let mut engine = Engine::new(seeded());
    demo::install(&mut engine).unwrap();
    let metrics = Metrics::new();
    let script = demo::script();

    let mut saw_red = false;
    for _ in 0..demo::DEMO_TICKS {
        simulation::run_tick(&mut engine, &script, &metrics);
        saw_red |= engine.shapes().iter().any(|s| s.color == "RED" && s.size == 30.0);
    }

    assert!(saw_red);
    assert!(engine.world().is_empty());
    assert_eq!(metrics.snapshot(0).culled, 3);
}

#[test]
fn spawn_context_reaches_the_world() {
    let mut engine = Engine::new(seeded());
    demo::install(&mut engine).unwrap();
    engine.enqueue_event(names::LEFT_CLICK, Default::default());
    engine.drain();

    let spawned = engine
        .pending_events()
        .iter()
        .filter(|e| e.name == names::SPAWN)
        .count();
    // spawn events raised during a drain are consumed by the same drain
    assert_eq!(spawned, 0);
    assert_eq!(engine.world().len(), 1);
    let shape = &engine.shapes()[0];
    assert!(matches!(shape.context().get(keys::SHAPE), Some(Value::Shape(id)) if *id == shape.id));
}
