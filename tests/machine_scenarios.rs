//! End-to-end scenarios for hierarchical and layered machines.

use layerfsm::core::{Condition, LayerOutputs, LayeredContext, State, StateEvent};
use layerfsm::machine::{LayeredMachine, Machine};
use layerfsm::MachineBuilder;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Character {
    speed: f32,
    health: i32,
    outputs: LayerOutputs,
    trail: Vec<String>,
}

impl LayeredContext for Character {
    fn set_layer_output(&mut self, layer_id: &str, state_id: &str) {
        self.outputs.set_layer_output(layer_id, state_id);
    }

    fn layer_output(&self, layer_id: &str) -> Option<&str> {
        self.outputs.layer_output(layer_id)
    }
}

struct Tracked {
    id: &'static str,
    initial: Option<&'static str>,
}

impl Tracked {
    fn leaf(id: &'static str) -> Self {
        Self { id, initial: None }
    }

    fn compound(id: &'static str, initial: &'static str) -> Self {
        Self {
            id,
            initial: Some(initial),
        }
    }
}

impl State<Character> for Tracked {
    fn id(&self) -> &str {
        self.id
    }

    fn is_compound(&self) -> bool {
        self.initial.is_some()
    }

    fn initial_sub_state(&self) -> Option<&str> {
        self.initial
    }

    fn on_enter(&mut self, ctx: &mut Character) {
        ctx.trail.push(format!("+{}", self.id));
    }

    fn on_exit(&mut self, ctx: &mut Character) {
        ctx.trail.push(format!("-{}", self.id));
    }
}

fn record_events(machine: &mut Machine<Character>) -> Arc<Mutex<Vec<StateEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    machine.add_listener(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

#[test]
fn idle_to_walking_when_speed_rises() {
    let mut machine = Machine::new();
    machine
        .register_state(Tracked::leaf("Idle"), None, true)
        .unwrap();
    machine
        .register_state(Tracked::leaf("Walking"), None, false)
        .unwrap();
    machine
        .add_transition(
            "Idle",
            "Walking",
            Some(Condition::new(|c: &Character| c.speed > 0.0)),
            0,
        )
        .unwrap();
    let events = record_events(&mut machine);

    let mut ctx = Character::default();
    machine.start(&mut ctx, "Idle").unwrap();

    machine.update(&mut ctx, 0.016);
    assert!(machine.is_in_state("Idle"));

    ctx.speed = 5.0;
    machine.update(&mut ctx, 0.016);
    assert!(machine.is_in_state("Walking"));

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            StateEvent::entered("Idle"),
            StateEvent::exited("Idle"),
            StateEvent::entered("Walking"),
        ]
    );
}

#[test]
fn transition_into_compound_lands_on_initial_child() {
    let mut machine = MachineBuilder::<Character>::new()
        .root_state(Tracked::leaf("Idle"))
        .root_state(Tracked::compound("Locomotion", "Walking"))
        .state(Tracked::leaf("Walking"), "Locomotion")
        .transition("Idle", "Locomotion", None, 0)
        .build()
        .unwrap();

    let mut ctx = Character::default();
    machine.start_with_root(&mut ctx).unwrap();
    machine.update(&mut ctx, 0.016);

    assert_eq!(machine.current_path(), ["Locomotion", "Walking"]);
    assert_eq!(ctx.trail, vec!["+Idle", "-Idle", "+Locomotion", "+Walking"]);
}

#[test]
fn equal_priority_ties_fire_first_inserted() {
    let mut machine = Machine::new();
    for (id, root) in [("A", true), ("B", false), ("C", false)] {
        machine.register_state(Tracked::leaf(id), None, root).unwrap();
    }
    machine.add_transition("A", "B", None, 3).unwrap();
    machine.add_transition("A", "C", None, 3).unwrap();

    let mut ctx = Character::default();
    machine.start_with_root(&mut ctx).unwrap();
    machine.update(&mut ctx, 0.016);

    assert!(machine.is_in_state("B"));
}

#[test]
fn wildcard_respects_priority_against_specific_sources() {
    let mut machine = Machine::new();
    for (id, root) in [("Idle", true), ("Walking", false), ("Dead", false)] {
        machine.register_state(Tracked::leaf(id), None, root).unwrap();
    }
    machine
        .add_any_transition(
            "Dead",
            Some(Condition::new(|c: &Character| c.health <= 0)),
            1,
        )
        .unwrap();
    machine.add_transition("Idle", "Walking", None, 5).unwrap();

    let mut ctx = Character {
        health: 0,
        ..Default::default()
    };
    machine.start_with_root(&mut ctx).unwrap();

    // Higher-priority specific transition wins even though the wildcard holds
    machine.update(&mut ctx, 0.016);
    assert!(machine.is_in_state("Walking"));

    // Wildcard fires from a state with no specific transitions
    machine.update(&mut ctx, 0.016);
    assert!(machine.is_in_state("Dead"));
}

#[test]
fn wildcard_with_higher_priority_preempts() {
    let mut machine = Machine::new();
    for (id, root) in [("Idle", true), ("Walking", false), ("Dead", false)] {
        machine.register_state(Tracked::leaf(id), None, root).unwrap();
    }
    machine.add_transition("Idle", "Walking", None, 0).unwrap();
    machine
        .add_any_transition(
            "Dead",
            Some(Condition::new(|c: &Character| c.health <= 0)),
            100,
        )
        .unwrap();

    let mut ctx = Character::default();
    machine.start_with_root(&mut ctx).unwrap();
    machine.update(&mut ctx, 0.016);

    assert!(machine.is_in_state("Dead"));
}

#[test]
fn ancestor_sourced_transition_exits_to_common_ancestor() {
    let mut machine = MachineBuilder::<Character>::new()
        .root_state(Tracked::compound("Root", "Ground"))
        .state(Tracked::compound("Ground", "Locomotion"), "Root")
        .state(Tracked::compound("Locomotion", "Walking"), "Ground")
        .state(Tracked::leaf("Walking"), "Locomotion")
        .state(Tracked::leaf("Crouching"), "Ground")
        .state(Tracked::leaf("Falling"), "Root")
        .transition_when("Ground", "Falling", |c: &Character| c.speed < 0.0, 0)
        .build()
        .unwrap();

    let mut ctx = Character::default();
    machine.start_with_root(&mut ctx).unwrap();
    assert_eq!(
        machine.current_path_string(),
        "Root > Ground > Locomotion > Walking"
    );
    ctx.trail.clear();

    ctx.speed = -1.0;
    machine.update(&mut ctx, 0.016);

    assert_eq!(
        ctx.trail,
        vec!["-Walking", "-Locomotion", "-Ground", "+Falling"]
    );
    assert_eq!(machine.current_path_string(), "Root > Falling");
}

#[test]
fn reset_then_start_matches_fresh_machine() {
    let build = || {
        MachineBuilder::<Character>::new()
            .root_state(Tracked::compound("Root", "Locomotion"))
            .state(Tracked::compound("Locomotion", "Walking"), "Root")
            .state(Tracked::leaf("Walking"), "Locomotion")
            .state(Tracked::leaf("Running"), "Locomotion")
            .transition("Walking", "Running", None, 0)
            .build()
            .unwrap()
    };

    let mut reused = build();
    let mut ctx = Character::default();
    reused.start_with_root(&mut ctx).unwrap();
    reused.update(&mut ctx, 0.016);
    assert!(reused.is_in_state("Running"));
    reused.reset(&mut ctx);
    reused.start_with_root(&mut ctx).unwrap();

    let mut fresh = build();
    let mut fresh_ctx = Character::default();
    fresh.start_with_root(&mut fresh_ctx).unwrap();

    assert_eq!(reused.current_path(), fresh.current_path());
}

#[test]
fn layers_compose_within_a_single_tick() {
    let mut locomotion: Machine<Character> = Machine::new();
    locomotion
        .register_state(Tracked::leaf("Standing"), None, true)
        .unwrap();
    locomotion
        .register_state(Tracked::leaf("Moving"), None, false)
        .unwrap();
    locomotion
        .add_transition(
            "Standing",
            "Moving",
            Some(Condition::new(|c: &Character| c.speed > 0.0)),
            0,
        )
        .unwrap();

    let mut upper: Machine<Character> = Machine::new();
    upper
        .register_state(Tracked::leaf("Aiming"), None, true)
        .unwrap();
    upper
        .register_state(Tracked::leaf("Lowered"), None, false)
        .unwrap();
    upper
        .add_transition(
            "Aiming",
            "Lowered",
            Some(Condition::new(|c: &Character| {
                c.layer_output("Locomotion") == Some("Moving")
            })),
            0,
        )
        .unwrap();

    let mut layers = LayeredMachine::new();
    layers.add_layer("Locomotion", locomotion).unwrap();
    layers.add_layer("Upper", upper).unwrap();

    let initial = HashMap::from([
        ("Locomotion".to_string(), "Standing".to_string()),
        ("Upper".to_string(), "Aiming".to_string()),
    ]);
    layers.start(Character::default(), &initial).unwrap();

    layers.update(0.016);
    assert_eq!(layers.current_layers_string(), "Locomotion:Standing|Upper:Aiming");

    layers.context_mut().unwrap().speed = 3.0;
    layers.update(0.016);
    assert_eq!(layers.current_layers_string(), "Locomotion:Moving|Upper:Lowered");
    assert_eq!(layers.layer_current_state_id("Upper"), "Lowered");
}
