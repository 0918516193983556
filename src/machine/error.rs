//! Configuration errors raised by machines.

use thiserror::Error;

/// Errors raised by the call that introduces an invalid configuration.
///
/// Once a machine is running, invalid runtime requests degrade to no-ops
/// instead of producing these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("state id must be non-empty")]
    EmptyStateId,

    #[error("state id '{id}' is reserved for any-state transitions")]
    ReservedStateId { id: String },

    #[error("state not found: {id}")]
    StateNotFound { id: String },

    #[error("state '{id}' is on the active path and cannot be re-registered")]
    StateActive { id: String },

    #[error("no root state registered. Register a state with is_root or call set_root(id)")]
    NoRootState,

    #[error("could not resolve a path to '{id}'. Check compound initial sub-states and the parent chain for cycles")]
    UnresolvablePath { id: String },

    #[error("layer id must be non-empty")]
    EmptyLayerId,

    #[error("no layers registered. Call add_layer before start")]
    NoLayers,

    #[error("no initial state for layer '{layer}'")]
    MissingLayerInitialState { layer: String },

    #[error("layer '{layer}' failed to start: {source}")]
    LayerStart {
        layer: String,
        #[source]
        source: Box<MachineError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_id() {
        let err = MachineError::StateNotFound {
            id: "Walking".to_string(),
        };
        assert_eq!(err.to_string(), "state not found: Walking");

        let err = MachineError::MissingLayerInitialState {
            layer: "Upper".to_string(),
        };
        assert_eq!(err.to_string(), "no initial state for layer 'Upper'");
    }

    #[test]
    fn layer_start_exposes_source() {
        use std::error::Error as _;

        let err = MachineError::LayerStart {
            layer: "Base".to_string(),
            source: Box::new(MachineError::NoRootState),
        };

        assert!(err.to_string().starts_with("layer 'Base' failed to start"));
        assert!(err.source().is_some());
    }
}
