//! Build errors for the machine builder.

use crate::machine::MachineError;
use thiserror::Error;

/// Errors that can occur when building a machine.
///
/// Each variant wraps the [`MachineError`] raised by the registration that
/// was replayed into the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("state '{id}' could not be registered: {source}")]
    State {
        id: String,
        #[source]
        source: MachineError,
    },

    #[error("transition '{from}' -> '{to}' could not be added: {source}")]
    Transition {
        from: String,
        to: String,
        #[source]
        source: MachineError,
    },

    #[error("root '{id}' could not be set: {source}")]
    Root {
        id: String,
        #[source]
        source: MachineError,
    },
}

impl BuildError {
    /// The underlying machine error.
    pub fn machine_error(&self) -> &MachineError {
        match self {
            BuildError::State { source, .. }
            | BuildError::Transition { source, .. }
            | BuildError::Root { source, .. } => source,
        }
    }
}
