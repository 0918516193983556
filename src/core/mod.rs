//! Core building blocks shared by every machine.
//!
//! This module contains the pieces a machine is assembled from:
//! - State definitions via the `State` trait
//! - Conditions gating transitions
//! - The layered context contract
//! - Configuration, notifications and transition history

mod condition;
mod config;
mod context;
mod event;
mod history;
mod state;

pub use condition::Condition;
pub use config::{
    MachineConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_COMPOUND_EXPANSION_DEPTH,
    DEFAULT_MAX_PARENT_CHAIN_DEPTH, DEFAULT_PATH_SEPARATOR,
};
pub use context::{LayerOutputs, LayeredContext};
pub use event::{StateEvent, StateListener};
pub use history::{StateHistory, TransitionRecord};
pub use state::{State, ANY_STATE};
