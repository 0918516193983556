//! Layered composition of hierarchical machines.

use crate::core::LayeredContext;
use crate::machine::error::MachineError;
use crate::machine::hierarchical::Machine;
use std::collections::HashMap;
use tracing::{debug, trace};

struct Layer<C> {
    id: String,
    machine: Machine<C>,
}

/// Several [`Machine`]s updated in registration order every tick.
///
/// The layered machine owns the shared context. After each layer updates,
/// its leaf id is published into the context, so conditions of later layers
/// observe earlier layers' post-update state within the same tick.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::{Condition, LayerOutputs, State};
/// use layerfsm::machine::{LayeredMachine, Machine};
/// use std::collections::HashMap;
///
/// struct Named(&'static str);
/// impl State<LayerOutputs> for Named {
///     fn id(&self) -> &str {
///         self.0
///     }
/// }
///
/// let mut base: Machine<LayerOutputs> = Machine::new();
/// base.register_state(Named("Idle"), None, true).unwrap();
///
/// let mut upper: Machine<LayerOutputs> = Machine::new();
/// upper.register_state(Named("Relaxed"), None, true).unwrap();
/// upper.register_state(Named("Ready"), None, false).unwrap();
/// upper
///     .add_transition(
///         "Relaxed",
///         "Ready",
///         Some(Condition::new(|ctx: &LayerOutputs| ctx.layer_is("Base", "Idle"))),
///         0,
///     )
///     .unwrap();
///
/// let mut layers = LayeredMachine::new();
/// layers.add_layer("Base", base).unwrap();
/// layers.add_layer("Upper", upper).unwrap();
///
/// let initial = HashMap::from([
///     ("Base".to_string(), "Idle".to_string()),
///     ("Upper".to_string(), "Relaxed".to_string()),
/// ]);
/// layers.start(LayerOutputs::new(), &initial).unwrap();
/// layers.update(0.016);
///
/// assert_eq!(layers.current_layers_string(), "Base:Idle|Upper:Ready");
/// ```
pub struct LayeredMachine<C: LayeredContext> {
    layers: Vec<Layer<C>>,
    context: Option<C>,
    started: bool,
    paused: bool,
}

impl<C: LayeredContext> Default for LayeredMachine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LayeredContext> LayeredMachine<C> {
    /// Create an empty layered machine without a context
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            context: None,
            started: false,
            paused: false,
        }
    }

    /// Append a layer, or replace the machine of an existing layer in place.
    pub fn add_layer(&mut self, layer_id: &str, machine: Machine<C>) -> Result<(), MachineError> {
        if layer_id.is_empty() {
            return Err(MachineError::EmptyLayerId);
        }

        match self.layers.iter_mut().find(|layer| layer.id == layer_id) {
            Some(layer) => layer.machine = machine,
            None => self.layers.push(Layer {
                id: layer_id.to_string(),
                machine,
            }),
        }
        Ok(())
    }

    /// Remove a layer and return its machine.
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Machine<C>> {
        let index = self.layers.iter().position(|layer| layer.id == layer_id)?;
        Some(self.layers.remove(index).machine)
    }

    /// Start every layer, in order, at its entry of `initial_states`.
    ///
    /// Every layer must have a non-empty initial state before any layer is
    /// started. If a layer fails to start, layers already started are reset.
    pub fn start(
        &mut self,
        context: C,
        initial_states: &HashMap<String, String>,
    ) -> Result<(), MachineError> {
        if self.layers.is_empty() {
            return Err(MachineError::NoLayers);
        }
        if let Some(layer) = self.layers.iter().find(|layer| {
            initial_states
                .get(&layer.id)
                .is_none_or(|state| state.is_empty())
        }) {
            return Err(MachineError::MissingLayerInitialState {
                layer: layer.id.clone(),
            });
        }

        let context = self.context.insert(context);
        for index in 0..self.layers.len() {
            let layer = &mut self.layers[index];
            let initial = initial_states
                .get(&layer.id)
                .map(String::as_str)
                .unwrap_or_default();

            if let Err(source) = layer.machine.start(context, initial) {
                let layer_id = layer.id.clone();
                for started in &mut self.layers[..index] {
                    started.machine.reset(context);
                }
                return Err(MachineError::LayerStart {
                    layer: layer_id,
                    source: Box::new(source),
                });
            }
        }

        self.started = true;
        debug!(layers = %self.current_layers_string(), "layered machine started");
        Ok(())
    }

    /// Update every layer in order, publishing each layer's leaf id into the
    /// context right after that layer updates.
    pub fn update(&mut self, delta_time: f32) {
        if !self.started || self.paused || delta_time < 0.0 {
            return;
        }
        let Some(context) = self.context.as_mut() else {
            return;
        };

        for layer in &mut self.layers {
            layer.machine.update(context, delta_time);
            let output = layer.machine.current_leaf_id().unwrap_or_default();
            trace!(layer = %layer.id, state = output, "layer output");
            context.set_layer_output(&layer.id, output);
        }
    }

    /// Force `layer_id` to `to_state_id`. No-op for unknown layers.
    pub fn transition_layer_to(&mut self, layer_id: &str, to_state_id: &str) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == layer_id) {
            layer.machine.transition_to(context, to_state_id);
        }
    }

    /// Suspend updates of every layer
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume updates after [`pause`](LayeredMachine::pause)
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Reset every layer, then clear the started and paused flags.
    ///
    /// Layers can only hold active states once a context was supplied by
    /// [`start`](LayeredMachine::start), so without a context only the flags
    /// are cleared.
    pub fn reset(&mut self) {
        if let Some(context) = self.context.as_mut() {
            for layer in &mut self.layers {
                layer.machine.reset(context);
            }
        }
        self.started = false;
        self.paused = false;
    }

    /// Get the machine of `layer_id`
    pub fn machine(&self, layer_id: &str) -> Option<&Machine<C>> {
        self.layers
            .iter()
            .find(|layer| layer.id == layer_id)
            .map(|layer| &layer.machine)
    }

    /// Get the machine of `layer_id` mutably
    pub fn machine_mut(&mut self, layer_id: &str) -> Option<&mut Machine<C>> {
        self.layers
            .iter_mut()
            .find(|layer| layer.id == layer_id)
            .map(|layer| &mut layer.machine)
    }

    /// Leaf id of `layer_id`, or an empty string when the layer is unknown
    /// or inactive.
    pub fn layer_current_state_id(&self, layer_id: &str) -> &str {
        self.machine(layer_id)
            .and_then(Machine::current_leaf_id)
            .unwrap_or_default()
    }

    /// Summary of every layer as `"LayerId:StateId|LayerId:StateId"`.
    pub fn current_layers_string(&self) -> String {
        self.layers
            .iter()
            .map(|layer| {
                format!(
                    "{}:{}",
                    layer.id,
                    layer.machine.current_leaf_id().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Layer ids in update order.
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.id.as_str())
    }

    /// Number of layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Get the shared context, `None` before the first start
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }

    /// Get the shared context mutably
    pub fn context_mut(&mut self) -> Option<&mut C> {
        self.context.as_mut()
    }

    /// Whether every layer has been started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether updates are suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
