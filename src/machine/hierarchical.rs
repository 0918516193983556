//! Hierarchical state machine.

use crate::core::{
    Condition, MachineConfig, State, StateEvent, StateHistory, StateListener, TransitionRecord,
    ANY_STATE,
};
use crate::machine::error::MachineError;
use crate::machine::transition::{TransitionEntry, TransitionTable};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

type BoxedState<C> = Box<dyn State<C> + Send>;

/// Hierarchical state machine driven by a per-tick [`update`](Machine::update).
///
/// States form a forest through parent links. The machine keeps the active
/// path from a root down to the current leaf, expanding compound states to
/// their initial sub-states. Each tick the highest-priority transition whose
/// source is anywhere on the active path (or is [`ANY_STATE`]) and whose
/// condition holds fires; at most one transition fires per tick. If none
/// fires, only the leaf is updated.
///
/// The context `C` is owned by the caller and lent to every call that may
/// run state hooks.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::{Condition, State};
/// use layerfsm::machine::Machine;
///
/// struct Motion {
///     speed: f32,
/// }
///
/// struct Idle;
/// impl State<Motion> for Idle {
///     fn id(&self) -> &str {
///         "Idle"
///     }
/// }
///
/// struct Walking;
/// impl State<Motion> for Walking {
///     fn id(&self) -> &str {
///         "Walking"
///     }
/// }
///
/// let mut machine = Machine::new();
/// machine.register_state(Idle, None, true).unwrap();
/// machine.register_state(Walking, None, false).unwrap();
/// machine
///     .add_transition("Idle", "Walking", Some(Condition::new(|m: &Motion| m.speed > 0.0)), 0)
///     .unwrap();
///
/// let mut motion = Motion { speed: 0.0 };
/// machine.start_with_root(&mut motion).unwrap();
/// machine.update(&mut motion, 0.016);
/// assert!(machine.is_in_state("Idle"));
///
/// motion.speed = 5.0;
/// machine.update(&mut motion, 0.016);
/// assert!(machine.is_in_state("Walking"));
/// ```
pub struct Machine<C> {
    config: MachineConfig,
    states: HashMap<String, BoxedState<C>>,
    parents: HashMap<String, Option<String>>,
    transitions: TransitionTable<C>,
    active: Vec<String>,
    root: Option<String>,
    started: bool,
    paused: bool,
    listeners: Vec<StateListener>,
    history: StateHistory,
}

impl<C> Default for Machine<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Machine<C> {
    /// Create an empty machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create an empty machine with `config`.
    pub fn with_config(config: MachineConfig) -> Self {
        let history = StateHistory::with_capacity(config.history_capacity);
        Self {
            config,
            states: HashMap::new(),
            parents: HashMap::new(),
            transitions: TransitionTable::new(),
            active: Vec::new(),
            root: None,
            started: false,
            paused: false,
            listeners: Vec::new(),
            history,
        }
    }

    /// Get the machine configuration
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register a state under `parent` (`None` for a root of the forest).
    ///
    /// Registering an existing id replaces the state and its parent link.
    /// The first state registered with `is_root` and no parent becomes the
    /// root unless one is already set.
    ///
    /// # Errors
    ///
    /// Rejects empty ids, the reserved [`ANY_STATE`] id, and ids currently
    /// on the active path.
    pub fn register_state<S>(
        &mut self,
        state: S,
        parent: Option<&str>,
        is_root: bool,
    ) -> Result<(), MachineError>
    where
        S: State<C> + Send + 'static,
    {
        self.register_boxed_state(Box::new(state), parent, is_root)
    }

    /// Type-erased form of [`register_state`](Machine::register_state).
    pub fn register_boxed_state(
        &mut self,
        state: BoxedState<C>,
        parent: Option<&str>,
        is_root: bool,
    ) -> Result<(), MachineError> {
        let id = state.id().to_string();
        if id.is_empty() {
            return Err(MachineError::EmptyStateId);
        }
        if id == ANY_STATE {
            return Err(MachineError::ReservedStateId { id });
        }
        if self.active.contains(&id) {
            return Err(MachineError::StateActive { id });
        }

        let parent = parent.filter(|p| !p.is_empty()).map(str::to_string);
        if is_root && parent.is_none() && self.root.is_none() {
            debug!(state = %id, "root state registered");
            self.root = Some(id.clone());
        }

        trace!(state = %id, parent = ?parent, compound = state.is_compound(), "state registered");
        self.parents.insert(id.clone(), parent);
        self.states.insert(id, state);
        Ok(())
    }

    /// Designate the root used by [`start_with_root`](Machine::start_with_root).
    pub fn set_root(&mut self, root_id: &str) -> Result<(), MachineError> {
        self.require_registered(root_id)?;
        self.root = Some(root_id.to_string());
        Ok(())
    }

    /// Get the root used by `start_with_root`, if any
    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Add a transition from `from` (a state id or [`ANY_STATE`]) to `to`.
    ///
    /// Higher priorities are checked first; equal priorities are checked in
    /// insertion order. A transition without condition always holds.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        condition: Option<Condition<C>>,
        priority: i32,
    ) -> Result<(), MachineError> {
        if from.is_empty() || to.is_empty() {
            return Err(MachineError::EmptyStateId);
        }
        if from != ANY_STATE {
            self.require_registered(from)?;
        }
        self.require_registered(to)?;

        trace!(from, to, priority, "transition added");
        self.transitions.insert(TransitionEntry {
            from: from.to_string(),
            to: to.to_string(),
            condition,
            priority,
        });
        Ok(())
    }

    /// Add a transition that may fire from any active state.
    pub fn add_any_transition(
        &mut self,
        to: &str,
        condition: Option<Condition<C>>,
        priority: i32,
    ) -> Result<(), MachineError> {
        self.add_transition(ANY_STATE, to, condition, priority)
    }

    /// Subscribe to enter/exit notifications.
    pub fn add_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&StateEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Remove every listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Enter `initial_state_id`, expanding compound states down to a leaf.
    ///
    /// Any previously active path is discarded without exit hooks; call
    /// [`reset`](Machine::reset) first to exit it.
    ///
    /// # Errors
    ///
    /// Fails if the id is empty or unregistered, or if no path to a leaf can
    /// be resolved.
    pub fn start(&mut self, context: &mut C, initial_state_id: &str) -> Result<(), MachineError> {
        self.require_registered(initial_state_id)?;

        let path = self.path_to_leaf(initial_state_id);
        if path.is_empty() {
            return Err(MachineError::UnresolvablePath {
                id: initial_state_id.to_string(),
            });
        }

        self.active.clear();
        for id in path {
            self.enter(context, id);
        }

        self.started = true;
        debug!(path = %self.current_path_string(), "machine started");
        Ok(())
    }

    /// [`start`](Machine::start) from the configured root.
    pub fn start_with_root(&mut self, context: &mut C) -> Result<(), MachineError> {
        let root = self.root.clone().ok_or(MachineError::NoRootState)?;
        self.start(context, &root)
    }

    /// Advance one tick.
    ///
    /// Fires the first eligible transition, or updates the leaf if none is
    /// eligible. Does nothing when not started, paused, or when
    /// `delta_time` is negative.
    pub fn update(&mut self, context: &mut C, delta_time: f32) {
        if !self.started || self.active.is_empty() {
            return;
        }
        if self.paused || delta_time < 0.0 {
            trace!(paused = self.paused, delta_time, "update skipped");
            return;
        }

        let target = self
            .transitions
            .select(self.active.iter().map(String::as_str), context)
            .map(|entry| entry.to.clone());

        if let Some(to) = target {
            self.perform_transition(context, &to, false);
            return;
        }

        if let Some(leaf) = self.active.last() {
            if let Some(state) = self.states.get_mut(leaf) {
                state.on_update(context, delta_time);
            }
        }
    }

    /// Move to `to_state_id` without evaluating any condition.
    ///
    /// No-op when not started or when the id is unregistered.
    pub fn transition_to(&mut self, context: &mut C, to_state_id: &str) {
        if !self.started {
            return;
        }
        if !self.has_state(to_state_id) {
            debug!(to = to_state_id, "forced transition to unknown state ignored");
            return;
        }
        self.perform_transition(context, to_state_id, true);
    }

    /// Suspend updates without exiting any state
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume updates after [`pause`](Machine::pause)
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Exit every active state leaf-to-root and return to the unstarted
    /// state. Registrations and transitions are kept.
    pub fn reset(&mut self, context: &mut C) {
        self.paused = false;
        while let Some(id) = self.active.pop() {
            self.exit(context, &id);
        }
        self.started = false;
    }

    /// Ids from the root of `state_id`'s tree down to `state_id`, without
    /// compound expansion.
    ///
    /// Returns an empty path for unknown ids, cyclic parent chains, and
    /// chains longer than `max_parent_chain_depth`. A parent link naming an
    /// unregistered state ends the walk.
    pub fn path_to_state(&self, state_id: &str) -> Vec<String> {
        if !self.states.contains_key(state_id) {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = state_id;
        loop {
            if !visited.insert(current) {
                debug!(state = state_id, at = current, "cycle in parent chain");
                return Vec::new();
            }
            path.push(current.to_string());

            let parent = self
                .parents
                .get(current)
                .and_then(|parent| parent.as_deref())
                .filter(|p| self.states.contains_key(*p));
            let Some(parent) = parent else {
                break;
            };
            if path.len() >= self.config.max_parent_chain_depth {
                debug!(
                    state = state_id,
                    max = self.config.max_parent_chain_depth,
                    "parent chain exceeds maximum depth"
                );
                return Vec::new();
            }
            current = parent;
        }

        path.reverse();
        path
    }

    /// [`path_to_state`](Machine::path_to_state) extended through compound
    /// initial sub-states down to a leaf.
    ///
    /// Expansion stops early, returning the path so far, when a compound
    /// state names no registered sub-state, when the sub-state is already on
    /// the path, or after `max_compound_expansion_depth` steps.
    pub fn path_to_leaf(&self, state_id: &str) -> Vec<String> {
        let mut path = self.path_to_state(state_id);
        let mut expanded = 0;

        while expanded < self.config.max_compound_expansion_depth {
            let Some(tail) = path.last().and_then(|id| self.states.get(id)) else {
                break;
            };
            if !tail.is_compound() {
                break;
            }
            let Some(sub) = tail
                .initial_sub_state()
                .filter(|sub| self.states.contains_key(*sub))
            else {
                debug!(state = tail.id(), "compound state has no registered initial sub-state");
                break;
            };
            if path.iter().any(|id| id == sub) {
                debug!(state = tail.id(), sub, "compound expansion loops back onto its path");
                return path;
            }

            path.push(sub.to_string());
            expanded += 1;
        }

        path
    }

    /// Exit/enter between the active path and the leaf path of `to`.
    ///
    /// States shared by both paths stay entered. When the target path is
    /// fully contained in the active path, its last state is exited and
    /// re-entered.
    fn perform_transition(&mut self, context: &mut C, to: &str, forced: bool) {
        let target = self.path_to_leaf(to);
        if target.is_empty() {
            warn!(to, "transition target could not be resolved");
            return;
        }

        let mut common = self
            .active
            .iter()
            .zip(&target)
            .take_while(|(current, next)| current == next)
            .count();
        if common == target.len() {
            common -= 1;
        }

        let from = self.active.last().cloned();
        while self.active.len() > common {
            if let Some(id) = self.active.pop() {
                self.exit(context, &id);
            }
        }
        for id in target.into_iter().skip(common) {
            self.enter(context, id);
        }

        let record = TransitionRecord {
            from,
            to: self.active.last().cloned().unwrap_or_default(),
            forced,
            timestamp: Utc::now(),
        };
        debug!(
            from = ?record.from,
            to = %record.to,
            forced,
            path = %self.current_path_string(),
            "transition performed"
        );
        self.history.record(record);
    }

    fn enter(&mut self, context: &mut C, id: String) {
        if let Some(state) = self.states.get_mut(&id) {
            state.on_enter(context);
        }
        trace!(state = %id, "entered");
        let event = StateEvent::entered(id.as_str());
        self.active.push(id);
        self.emit(&event);
    }

    fn exit(&mut self, context: &mut C, id: &str) {
        if let Some(state) = self.states.get_mut(id) {
            state.on_exit(context);
        }
        trace!(state = id, "exited");
        self.emit(&StateEvent::exited(id));
    }

    fn emit(&mut self, event: &StateEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    fn require_registered(&self, id: &str) -> Result<(), MachineError> {
        if id.is_empty() {
            return Err(MachineError::EmptyStateId);
        }
        if !self.states.contains_key(id) {
            return Err(MachineError::StateNotFound { id: id.to_string() });
        }
        Ok(())
    }

    /// Whether `state_id` is registered
    pub fn has_state(&self, state_id: &str) -> bool {
        !state_id.is_empty() && self.states.contains_key(state_id)
    }

    /// Whether the current leaf is `state_id`.
    pub fn is_in_state(&self, state_id: &str) -> bool {
        !state_id.is_empty() && self.current_leaf_id() == Some(state_id)
    }

    /// Whether `state_id` is anywhere on the active path.
    pub fn is_in_state_or_descendant(&self, state_id: &str) -> bool {
        !state_id.is_empty() && self.active.iter().any(|id| id == state_id)
    }

    /// Get a registered state
    pub fn state(&self, state_id: &str) -> Option<&(dyn State<C> + Send + 'static)> {
        self.states.get(state_id).map(|state| &**state)
    }

    /// Get a registered state mutably
    pub fn state_mut(&mut self, state_id: &str) -> Option<&mut (dyn State<C> + Send + 'static)> {
        self.states.get_mut(state_id).map(|state| &mut **state)
    }

    /// Get the current leaf id, `None` when not started
    pub fn current_leaf_id(&self) -> Option<&str> {
        self.active.last().map(String::as_str)
    }

    /// Active path, root first.
    pub fn current_path(&self) -> &[String] {
        &self.active
    }

    /// Active path ids joined by the configured separator, root first.
    /// Empty when not started.
    pub fn current_path_string(&self) -> String {
        self.active.join(&self.config.path_separator)
    }

    /// Whether the machine has been started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether updates are suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of registered states
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Number of registered transitions
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Get the bounded transition history
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Drop every history record
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
