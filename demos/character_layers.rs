//! Layered Character Controller
//!
//! This example demonstrates two machines running as layers over one
//! character context.
//!
//! Key concepts:
//! - A hierarchical locomotion layer with compound states
//! - An upper-body layer reading the locomotion layer's output
//! - Per-tick update order: later layers see earlier layers' results
//! - Tracing output from the machines (set `RUST_LOG=layerfsm=debug`)
//!
//! Run with: cargo run --example character_layers

use layerfsm::core::{LayerOutputs, LayeredContext, State};
use layerfsm::{define_state, LayeredMachine, Machine, MachineBuilder, MachineError};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Character {
    speed: f32,
    grounded: bool,
    trigger_held: bool,
    stamina: f32,
    outputs: LayerOutputs,
}

impl LayeredContext for Character {
    fn set_layer_output(&mut self, layer_id: &str, state_id: &str) {
        self.outputs.set_layer_output(layer_id, state_id);
    }

    fn layer_output(&self, layer_id: &str) -> Option<&str> {
        self.outputs.layer_output(layer_id)
    }
}

define_state! { struct Grounded => "Grounded", initial: "Idle" }
define_state! { struct Idle => "Idle" }
define_state! { struct Airborne => "Airborne" }
define_state! { struct Holstered => "Holstered" }
define_state! { struct Aiming => "Aiming" }

/// Running drains stamina every tick.
struct Running;

impl State<Character> for Running {
    fn id(&self) -> &str {
        "Running"
    }

    fn on_update(&mut self, character: &mut Character, delta_time: f32) {
        character.stamina = (character.stamina - 10.0 * delta_time).max(0.0);
    }
}

/// Walking recovers stamina.
struct Walking;

impl State<Character> for Walking {
    fn id(&self) -> &str {
        "Walking"
    }

    fn on_update(&mut self, character: &mut Character, delta_time: f32) {
        character.stamina = (character.stamina + 5.0 * delta_time).min(100.0);
    }
}

/// Firing is only allowed while the locomotion layer is not running.
struct Firing {
    shots: u32,
}

impl State<Character> for Firing {
    fn id(&self) -> &str {
        "Firing"
    }

    fn on_enter(&mut self, _character: &mut Character) {
        self.shots += 1;
        println!("    bang #{}", self.shots);
    }
}

fn locomotion_layer() -> Result<Machine<Character>, layerfsm::BuildError> {
    MachineBuilder::new()
        .root_state(Grounded)
        .root_state(Airborne)
        .state(Idle, "Grounded")
        .state(Walking, "Grounded")
        .state(Running, "Grounded")
        .transition_when("Idle", "Walking", |c: &Character| c.speed > 0.0, 0)
        .transition_when("Walking", "Running", |c: &Character| c.speed > 4.0 && c.stamina > 20.0, 1)
        .transition_when("Walking", "Idle", |c: &Character| c.speed == 0.0, 0)
        .transition_when("Running", "Walking", |c: &Character| c.speed <= 4.0 || c.stamina == 0.0, 0)
        .transition_when("Grounded", "Airborne", |c: &Character| !c.grounded, 10)
        .transition_when("Airborne", "Grounded", |c: &Character| c.grounded, 0)
        .build()
}

fn upper_body_layer() -> Result<Machine<Character>, layerfsm::BuildError> {
    let running = |c: &Character| c.layer_output("Locomotion") == Some("Running");

    MachineBuilder::new()
        .root_state(Holstered)
        .root_state(Aiming)
        .root_state(Firing { shots: 0 })
        .transition_when("Holstered", "Aiming", move |c: &Character| c.trigger_held && !running(c), 0)
        .transition_when("Aiming", "Firing", |c: &Character| c.trigger_held, 0)
        .transition_when("Firing", "Aiming", |_: &Character| true, 0)
        .any_transition(
            "Holstered",
            Some(layerfsm::Condition::new(move |c: &Character| {
                running(c) || !c.trigger_held
            })),
            5,
        )
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("=== Layered Character Controller ===\n");

    let mut layers = LayeredMachine::new();
    layers.add_layer("Locomotion", locomotion_layer()?)?;
    layers.add_layer("UpperBody", upper_body_layer()?)?;

    let initial = HashMap::from([
        ("Locomotion".to_string(), "Grounded".to_string()),
        ("UpperBody".to_string(), "Holstered".to_string()),
    ]);
    let character = Character {
        grounded: true,
        stamina: 60.0,
        ..Default::default()
    };
    layers.start(character, &initial)?;
    println!("Started: {}\n", layers.current_layers_string());

    // (speed, grounded, trigger held) per tick
    let script = [
        (0.0, true, false),
        (2.0, true, false),
        (2.0, true, true),
        (2.0, true, true),
        (6.0, true, true),
        (6.0, true, true),
        (6.0, false, false),
        (6.0, true, false),
        (0.0, true, true),
    ];

    for (tick, (speed, grounded, trigger)) in script.into_iter().enumerate() {
        if let Some(character) = layers.context_mut() {
            character.speed = speed;
            character.grounded = grounded;
            character.trigger_held = trigger;
        }
        layers.update(0.5);

        let stamina = layers.context().map_or(0.0, |c| c.stamina);
        println!(
            "tick {tick}: {:<40} stamina {stamina:>5.1}",
            layers.current_layers_string()
        );
    }

    if let Some(locomotion) = layers.machine("Locomotion") {
        println!("\nLocomotion path: {}", locomotion.current_path_string());
    }

    // Layers without an initial state are rejected before anything starts
    let mut incomplete = LayeredMachine::new();
    incomplete.add_layer("Locomotion", locomotion_layer()?)?;
    match incomplete.start(Character::default(), &HashMap::new()) {
        Err(MachineError::MissingLayerInitialState { layer }) => {
            println!("Rejected start: layer {layer} has no initial state");
        }
        other => println!("Unexpected start result: {other:?}"),
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
