//! Shared context for layered machines.

use std::collections::HashMap;

/// Context shared by all layers of a
/// [`LayeredMachine`](crate::machine::LayeredMachine).
///
/// After each layer updates, the layered machine publishes that layer's
/// resolved leaf id through [`set_layer_output`](LayeredContext::set_layer_output).
/// Conditions of later layers read it back with
/// [`layer_output`](LayeredContext::layer_output) within the same tick.
pub trait LayeredContext {
    /// Record the current leaf id of `layer_id`. An empty id means the layer
    /// has no active state.
    fn set_layer_output(&mut self, layer_id: &str, state_id: &str);

    /// Last published leaf id of `layer_id`, if any.
    fn layer_output(&self, layer_id: &str) -> Option<&str>;
}

/// Per-layer output table.
///
/// Embed it in a context type and delegate [`LayeredContext`] to it, or use
/// it directly as the context when states need nothing else.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::{LayerOutputs, LayeredContext};
///
/// let mut outputs = LayerOutputs::new();
/// outputs.set_layer_output("Locomotion", "Running");
///
/// assert_eq!(outputs.layer_output("Locomotion"), Some("Running"));
/// assert!(outputs.layer_is("Locomotion", "Running"));
/// assert_eq!(outputs.layer_output("Action"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerOutputs {
    outputs: HashMap<String, String>,
}

impl LayerOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `layer_id` last published exactly `state_id`.
    pub fn layer_is(&self, layer_id: &str, state_id: &str) -> bool {
        self.layer_output(layer_id) == Some(state_id)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
    }

    /// Iterate over `(layer_id, state_id)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl LayeredContext for LayerOutputs {
    fn set_layer_output(&mut self, layer_id: &str, state_id: &str) {
        match self.outputs.get_mut(layer_id) {
            Some(existing) => {
                existing.clear();
                existing.push_str(state_id);
            }
            None => {
                self.outputs
                    .insert(layer_id.to_string(), state_id.to_string());
            }
        }
    }

    fn layer_output(&self, layer_id: &str) -> Option<&str> {
        self.outputs.get(layer_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_overwrite_per_layer() {
        let mut outputs = LayerOutputs::new();
        outputs.set_layer_output("Base", "Idle");
        outputs.set_layer_output("Base", "Walking");
        outputs.set_layer_output("Upper", "Aiming");

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs.layer_output("Base"), Some("Walking"));
        assert!(outputs.layer_is("Upper", "Aiming"));
        assert!(!outputs.layer_is("Upper", "Idle"));
    }

    #[test]
    fn empty_output_is_distinct_from_missing() {
        let mut outputs = LayerOutputs::new();
        outputs.set_layer_output("Base", "");

        assert_eq!(outputs.layer_output("Base"), Some(""));
        assert_eq!(outputs.layer_output("Other"), None);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut outputs = LayerOutputs::new();
        outputs.set_layer_output("Base", "Idle");
        outputs.clear();

        assert!(outputs.is_empty());
        assert_eq!(outputs.iter().count(), 0);
    }
}
