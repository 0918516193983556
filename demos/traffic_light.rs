//! Traffic Light State Machine
//!
//! This example demonstrates a cyclic machine driven by elapsed time.
//!
//! Key concepts:
//! - Cyclic state transitions (states repeat)
//! - Declaring states with `define_state!`
//! - Timer conditions read from the context
//! - An emergency wildcard transition that preempts the cycle
//!
//! Run with: cargo run --example traffic_light

use layerfsm::core::State;
use layerfsm::{define_state, Condition, MachineBuilder, StateEvent};

define_state! { struct Red => "Red" }
define_state! { struct Green => "Green" }
define_state! { struct Yellow => "Yellow" }

/// Flashing red while an emergency vehicle passes.
struct Flashing;

impl State<Junction> for Flashing {
    fn id(&self) -> &str {
        "Flashing"
    }

    fn on_enter(&mut self, junction: &mut Junction) {
        junction.flashing = true;
        println!("  !! emergency: all directions flashing red");
    }

    fn on_exit(&mut self, junction: &mut Junction) {
        junction.flashing = false;
    }
}

struct Junction {
    elapsed: f32,
    emergency: bool,
    flashing: bool,
}

fn phase_over(seconds: f32) -> impl Fn(&Junction) -> bool + Send + Sync + 'static {
    move |junction| junction.elapsed >= seconds
}

fn main() {
    println!("=== Traffic Light State Machine ===\n");

    let mut machine = MachineBuilder::<Junction>::new()
        .root_state(Red)
        .root_state(Green)
        .root_state(Yellow)
        .root_state(Flashing)
        .transition_when("Red", "Green", phase_over(4.0), 0)
        .transition_when("Green", "Yellow", phase_over(3.0), 0)
        .transition_when("Yellow", "Red", phase_over(1.0), 0)
        .transition_when("Flashing", "Red", |j: &Junction| !j.emergency, 0)
        .any_transition(
            "Flashing",
            Some(Condition::new(|j: &Junction| j.emergency && !j.flashing)),
            10,
        )
        .build()
        .unwrap();

    machine.add_listener(|event: &StateEvent| {
        if event.is_entered() {
            println!("  -> {}", event.state_id());
        }
    });

    let mut junction = Junction {
        elapsed: 0.0,
        emergency: false,
        flashing: false,
    };
    machine.start_with_root(&mut junction).unwrap();

    println!("Running two full cycles (0.5s ticks):");
    let tick = 0.5;
    for step in 0..40 {
        if step == 30 {
            junction.emergency = true;
        }
        if step == 33 {
            junction.emergency = false;
        }

        // Every phase starts its own timer
        let before = machine.current_leaf_id().map(str::to_string);
        machine.update(&mut junction, tick);
        if machine.current_leaf_id() != before.as_deref() {
            junction.elapsed = 0.0;
        } else {
            junction.elapsed += tick;
        }
    }

    println!("\nFinal state: {}", machine.current_path_string());
    if let Some(last) = machine.history().last() {
        println!("Last transition: {:?} -> {}", last.from, last.to);
    }

    println!("\nKey Characteristics:");
    println!("- No final state (cycles indefinitely)");
    println!("- Conditions read timers from the context");
    println!("- The wildcard transition fires from any light");

    println!("\n=== Example Complete ===");
}
