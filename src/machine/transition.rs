//! Priority-ordered transition table.

use crate::core::{Condition, ANY_STATE};
use std::collections::HashSet;

/// A registered transition.
#[derive(Debug)]
pub struct TransitionEntry<C> {
    /// Source state id, or [`ANY_STATE`]
    pub from: String,
    pub to: String,
    pub condition: Option<Condition<C>>,
    pub priority: i32,
}

impl<C> TransitionEntry<C> {
    /// Check if this transition can fire given the ids on the active path.
    pub fn can_fire(&self, active_ids: &HashSet<&str>, context: &C) -> bool {
        if !active_ids.contains(self.from.as_str()) {
            return false;
        }

        self.condition.as_ref().is_none_or(|c| c.evaluate(context))
    }

    pub fn is_any_state(&self) -> bool {
        self.from == ANY_STATE
    }
}

/// Transitions kept sorted by descending priority. Equal priorities keep
/// insertion order.
#[derive(Debug)]
pub struct TransitionTable<C> {
    entries: Vec<TransitionEntry<C>>,
}

impl<C> Default for TransitionTable<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C> TransitionTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry and restore priority order (stable).
    pub fn insert(&mut self, entry: TransitionEntry<C>) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// First entry, in priority order, whose source is on the active path
    /// (or is the wildcard) and whose condition holds.
    pub fn select<'a, I>(&self, active_path: I, context: &C) -> Option<&TransitionEntry<C>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut active_ids: HashSet<&str> = active_path.into_iter().collect();
        active_ids.insert(ANY_STATE);

        self.entries
            .iter()
            .find(|entry| entry.can_fire(&active_ids, context))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionEntry<C>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
