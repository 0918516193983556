//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Default bound on parent-chain walks.
pub const DEFAULT_MAX_PARENT_CHAIN_DEPTH: usize = 64;

/// Default bound on compound-state expansion.
pub const DEFAULT_MAX_COMPOUND_EXPANSION_DEPTH: usize = 64;

/// Default separator used by [`Machine::current_path_string`](crate::machine::Machine::current_path_string).
pub const DEFAULT_PATH_SEPARATOR: &str = " > ";

/// Default number of transitions kept in a machine's history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Tunables for a [`Machine`](crate::machine::Machine).
///
/// The depth bounds are cycle guards for misconfigured hierarchies, not
/// performance knobs. Missing fields fall back to their defaults when
/// deserializing.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::MachineConfig;
///
/// let config = MachineConfig::default()
///     .with_path_separator("/")
///     .with_history_capacity(0);
///
/// assert_eq!(config.max_parent_chain_depth, 64);
/// assert_eq!(config.path_separator, "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Maximum number of states on a root-to-state path.
    pub max_parent_chain_depth: usize,

    /// Maximum number of initial sub-states appended while expanding a
    /// compound state to its leaf.
    pub max_compound_expansion_depth: usize,

    /// Separator placed between ids in the current path string.
    pub path_separator: String,

    /// Number of recent transitions retained. `0` disables history.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_parent_chain_depth: DEFAULT_MAX_PARENT_CHAIN_DEPTH,
            max_compound_expansion_depth: DEFAULT_MAX_COMPOUND_EXPANSION_DEPTH,
            path_separator: DEFAULT_PATH_SEPARATOR.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    pub fn with_max_parent_chain_depth(mut self, depth: usize) -> Self {
        self.max_parent_chain_depth = depth;
        self
    }

    pub fn with_max_compound_expansion_depth(mut self, depth: usize) -> Self {
        self.max_compound_expansion_depth = depth;
        self
    }

    pub fn with_path_separator(mut self, separator: impl Into<String>) -> Self {
        self.path_separator = separator.into();
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}
