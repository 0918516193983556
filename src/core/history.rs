//! Bounded transition history.
//!
//! Every transition a machine performs is recorded here for inspection
//! tooling. Only the most recent `capacity` records are retained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single performed transition.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: Some("Idle".to_string()),
///     to: "Walking".to_string(),
///     forced: false,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Walking");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Leaf before the transition, `None` if the path was empty
    pub from: Option<String>,
    /// Leaf after the transition
    pub to: String,
    /// `true` for forced transitions, `false` for condition-triggered ones
    pub forced: bool,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of transitions, oldest first.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(2);
/// for (from, to) in [("A", "B"), ("B", "C"), ("C", "D")] {
///     history.record(TransitionRecord {
///         from: Some(from.to_string()),
///         to: to.to_string(),
///         forced: false,
///         timestamp: Utc::now(),
///     });
/// }
///
/// // Oldest record was dropped
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec!["B", "C", "D"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl StateHistory {
    /// Create an empty history retaining at most `capacity` records.
    ///
    /// A capacity of `0` records nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a record, dropping the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Leaf ids traversed: the `from` of the oldest retained record, then the
    /// `to` of each record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(from) = self.records.front().and_then(|r| r.from.as_deref()) {
            path.push(from);
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> impl DoubleEndedIterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
