//! Enter/exit notifications.

use serde::{Deserialize, Serialize};

/// Notification emitted synchronously whenever a state joins or leaves the
/// active path.
///
/// Exits are emitted leaf-to-root before entries, which are emitted
/// root-to-leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateEvent {
    Entered { state_id: String },
    Exited { state_id: String },
}

impl StateEvent {
    pub fn entered(state_id: impl Into<String>) -> Self {
        StateEvent::Entered {
            state_id: state_id.into(),
        }
    }

    pub fn exited(state_id: impl Into<String>) -> Self {
        StateEvent::Exited {
            state_id: state_id.into(),
        }
    }

    pub fn state_id(&self) -> &str {
        match self {
            StateEvent::Entered { state_id } | StateEvent::Exited { state_id } => state_id,
        }
    }

    pub fn is_entered(&self) -> bool {
        matches!(self, StateEvent::Entered { .. })
    }
}

/// Listener invoked for every [`StateEvent`] of a machine.
pub type StateListener = Box<dyn FnMut(&StateEvent) + Send>;
