//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder and a state declaration macro for
//! assembling machines with minimal boilerplate. The builder adds no
//! semantics of its own: it replays registrations into a
//! [`Machine`](crate::machine::Machine).

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;
