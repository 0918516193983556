//! Hierarchical and layered state machines.
//!
//! # Key Concepts
//!
//! - **Machine**: owns a tree of states, the active root-to-leaf path and a
//!   priority-ordered transition table; fires at most one transition per tick
//! - **Layered Machine**: runs several machines in a fixed order each tick,
//!   publishing each layer's leaf id into a shared context
//! - **Errors**: configuration mistakes fail fast with [`MachineError`];
//!   invalid requests on a running machine are ignored

mod error;
mod hierarchical;
mod layered;
mod transition;

pub use error::MachineError;
pub use hierarchical::Machine;
pub use layered::LayeredMachine;
pub use transition::{TransitionEntry, TransitionTable};
