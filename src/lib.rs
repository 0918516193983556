//! Layerfsm: hierarchical, layered finite state machines
//!
//! Layerfsm drives state trees from a per-tick update loop, the way game
//! characters and simulations are usually driven: once per frame, with a
//! delta time, from a single thread.
//!
//! # Core Concepts
//!
//! - **State**: Behavior with enter/update/exit hooks via the `State` trait;
//!   compound states expand to an initial child
//! - **Machine**: Owns a state tree and fires at most one priority-ordered
//!   transition per tick, from any state on the active path or from any
//!   state at all (`"*"`)
//! - **Layered Machine**: Runs several machines in order, publishing each
//!   layer's leaf into a shared context read by later layers
//!
//! # Example
//!
//! ```rust
//! use layerfsm::builder::MachineBuilder;
//! use layerfsm::core::{Condition, StateEvent};
//! use layerfsm::define_state;
//! use std::sync::{Arc, Mutex};
//!
//! define_state! { struct Idle => "Idle" }
//! define_state! { struct Walking => "Walking" }
//!
//! struct Motion {
//!     speed: f32,
//! }
//!
//! let mut machine = MachineBuilder::<Motion>::new()
//!     .root_state(Idle)
//!     .root_state(Walking)
//!     .transition("Idle", "Walking", Some(Condition::new(|m: &Motion| m.speed > 0.0)), 0)
//!     .build()
//!     .unwrap();
//!
//! let events = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&events);
//! machine.add_listener(move |event: &StateEvent| sink.lock().unwrap().push(event.clone()));
//!
//! let mut motion = Motion { speed: 0.0 };
//! machine.start_with_root(&mut motion).unwrap();
//! machine.update(&mut motion, 0.016);
//! assert!(machine.is_in_state("Idle"));
//!
//! motion.speed = 5.0;
//! machine.update(&mut motion, 0.016);
//! assert!(machine.is_in_state("Walking"));
//! assert_eq!(
//!     events.lock().unwrap()[1..],
//!     [StateEvent::exited("Idle"), StateEvent::entered("Walking")]
//! );
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{Condition, LayerOutputs, LayeredContext, MachineConfig, State, StateEvent, ANY_STATE};
pub use machine::{LayeredMachine, Machine, MachineError};
