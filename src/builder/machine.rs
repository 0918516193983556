//! Builder for constructing hierarchical machines.

use crate::builder::error::BuildError;
use crate::core::{Condition, MachineConfig, State, ANY_STATE};
use crate::machine::Machine;

enum Registration<C> {
    State {
        state: Box<dyn State<C> + Send>,
        parent: Option<String>,
        is_root: bool,
    },
    Transition {
        from: String,
        to: String,
        condition: Option<Condition<C>>,
        priority: i32,
    },
}

/// Builder for constructing machines with a fluent API.
///
/// Registrations are replayed into the machine, in the order they were
/// given, when [`build`](MachineBuilder::build) is called. States may
/// therefore be declared in any order relative to each other, but a
/// transition must come after the states it references.
///
/// # Example
///
/// ```rust
/// use layerfsm::builder::MachineBuilder;
/// use layerfsm::define_state;
///
/// define_state! { struct Locomotion => "Locomotion", initial: "Walking" }
/// define_state! { struct Walking => "Walking" }
/// define_state! { struct Running => "Running" }
///
/// struct Input {
///     sprint: bool,
/// }
///
/// let mut machine = MachineBuilder::<Input>::new()
///     .root_state(Locomotion)
///     .state(Walking, "Locomotion")
///     .state(Running, "Locomotion")
///     .transition_when("Walking", "Running", |input: &Input| input.sprint, 0)
///     .build()
///     .unwrap();
///
/// let mut input = Input { sprint: false };
/// machine.start_with_root(&mut input).unwrap();
/// assert_eq!(machine.current_path_string(), "Locomotion > Walking");
///
/// input.sprint = true;
/// machine.update(&mut input, 0.016);
/// assert_eq!(machine.current_path_string(), "Locomotion > Running");
/// ```
pub struct MachineBuilder<C> {
    config: MachineConfig,
    registrations: Vec<Registration<C>>,
    root: Option<String>,
}

impl<C> MachineBuilder<C> {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            registrations: Vec::new(),
            root: None,
        }
    }

    /// Use `config` for the built machine.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a root state. The first root added becomes the machine's root
    /// unless [`root`](MachineBuilder::root) overrides it.
    pub fn root_state<S>(mut self, state: S) -> Self
    where
        S: State<C> + Send + 'static,
    {
        if self.root.is_none() {
            self.root = Some(state.id().to_string());
        }
        self.registrations.push(Registration::State {
            state: Box::new(state),
            parent: None,
            is_root: true,
        });
        self
    }

    /// Add a state under `parent`.
    pub fn state<S>(mut self, state: S, parent: &str) -> Self
    where
        S: State<C> + Send + 'static,
    {
        self.registrations.push(Registration::State {
            state: Box::new(state),
            parent: Some(parent.to_string()),
            is_root: false,
        });
        self
    }

    /// Add a transition with an optional condition.
    pub fn transition(
        mut self,
        from: &str,
        to: &str,
        condition: Option<Condition<C>>,
        priority: i32,
    ) -> Self {
        self.registrations.push(Registration::Transition {
            from: from.to_string(),
            to: to.to_string(),
            condition,
            priority,
        });
        self
    }

    /// Add a transition guarded by a closure.
    pub fn transition_when<F>(self, from: &str, to: &str, predicate: F, priority: i32) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.transition(from, to, Some(Condition::new(predicate)), priority)
    }

    /// Add a transition that may fire from any active state.
    pub fn any_transition(self, to: &str, condition: Option<Condition<C>>, priority: i32) -> Self {
        self.transition(ANY_STATE, to, condition, priority)
    }

    /// Set the root explicitly.
    pub fn root(mut self, root_id: &str) -> Self {
        self.root = Some(root_id.to_string());
        self
    }

    /// Build the machine.
    ///
    /// Returns the error of the first registration the machine rejects.
    pub fn build(self) -> Result<Machine<C>, BuildError> {
        let mut machine = Machine::with_config(self.config);

        for registration in self.registrations {
            match registration {
                Registration::State {
                    state,
                    parent,
                    is_root,
                } => {
                    let id = state.id().to_string();
                    machine
                        .register_boxed_state(state, parent.as_deref(), is_root)
                        .map_err(|source| BuildError::State { id, source })?;
                }
                Registration::Transition {
                    from,
                    to,
                    condition,
                    priority,
                } => {
                    if let Err(source) = machine.add_transition(&from, &to, condition, priority) {
                        return Err(BuildError::Transition { from, to, source });
                    }
                }
            }
        }

        if let Some(root) = self.root {
            if let Err(source) = machine.set_root(&root) {
                return Err(BuildError::Root { id: root, source });
            }
        }

        Ok(machine)
    }
}

impl<C> Default for MachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
