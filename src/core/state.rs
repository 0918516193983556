//! Core State trait for hierarchical machine states.
//!
//! A state is a named unit of behavior with enter/update/exit hooks. States
//! are registered into a [`Machine`](crate::machine::Machine) which owns them
//! for its lifetime and drives the hooks as the active path changes.

/// Reserved id used as the source of "any state" transitions.
///
/// It can never be registered as a real state id.
pub const ANY_STATE: &str = "*";

/// Trait for hierarchical state machine states.
///
/// `C` is the context shared by every state and every transition condition
/// of a machine. All hooks have empty default implementations so simple
/// states only provide an [`id`](State::id).
///
/// A compound state never terminates the active path: entering it expands
/// to [`initial_sub_state`](State::initial_sub_state), repeatedly, until a
/// leaf is reached.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::State;
///
/// struct Player {
///     stamina: f32,
/// }
///
/// struct Sprinting;
///
/// impl State<Player> for Sprinting {
///     fn id(&self) -> &str {
///         "Sprinting"
///     }
///
///     fn on_update(&mut self, player: &mut Player, delta_time: f32) {
///         player.stamina -= 10.0 * delta_time;
///     }
/// }
///
/// let mut player = Player { stamina: 100.0 };
/// let mut state = Sprinting;
/// state.on_update(&mut player, 0.5);
/// assert_eq!(player.stamina, 95.0);
/// assert!(!State::<Player>::is_compound(&state));
/// ```
pub trait State<C> {
    /// Unique, non-empty identifier of this state within its machine.
    fn id(&self) -> &str;

    /// Whether entering this state must expand to a child state.
    ///
    /// Default implementation returns `false`.
    fn is_compound(&self) -> bool {
        false
    }

    /// Child entered by default when this compound state is entered.
    ///
    /// Only consulted when [`is_compound`](State::is_compound) is `true`.
    fn initial_sub_state(&self) -> Option<&str> {
        None
    }

    /// Called when the state joins the active path.
    fn on_enter(&mut self, _context: &mut C) {}

    /// Called once per tick while this state is the active leaf and no
    /// transition fired.
    fn on_update(&mut self, _context: &mut C, _delta_time: f32) {}

    /// Called when the state leaves the active path.
    fn on_exit(&mut self, _context: &mut C) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counters {
        entered: u32,
        updated: f32,
        exited: u32,
    }

    struct Leaf;

    impl State<Counters> for Leaf {
        fn id(&self) -> &str {
            "Leaf"
        }

        fn on_enter(&mut self, context: &mut Counters) {
            context.entered += 1;
        }

        fn on_update(&mut self, context: &mut Counters, delta_time: f32) {
            context.updated += delta_time;
        }

        fn on_exit(&mut self, context: &mut Counters) {
            context.exited += 1;
        }
    }

    struct Group;

    impl State<Counters> for Group {
        fn id(&self) -> &str {
            "Group"
        }

        fn is_compound(&self) -> bool {
            true
        }

        fn initial_sub_state(&self) -> Option<&str> {
            Some("Leaf")
        }
    }

    #[test]
    fn defaults_describe_a_plain_leaf() {
        struct Bare;
        impl State<()> for Bare {
            fn id(&self) -> &str {
                "Bare"
            }
        }

        let mut bare = Bare;
        assert_eq!(bare.id(), "Bare");
        assert!(!bare.is_compound());
        assert!(bare.initial_sub_state().is_none());

        // Default hooks are no-ops
        bare.on_enter(&mut ());
        bare.on_update(&mut (), 1.0);
        bare.on_exit(&mut ());
    }

    #[test]
    fn hooks_mutate_context() {
        let mut counters = Counters::default();
        let mut leaf = Leaf;

        leaf.on_enter(&mut counters);
        leaf.on_update(&mut counters, 0.25);
        leaf.on_update(&mut counters, 0.25);
        leaf.on_exit(&mut counters);

        assert_eq!(counters.entered, 1);
        assert_eq!(counters.updated, 0.5);
        assert_eq!(counters.exited, 1);
    }

    #[test]
    fn compound_state_names_initial_child() {
        let group = Group;
        assert!(group.is_compound());
        assert_eq!(group.initial_sub_state(), Some("Leaf"));
    }

    #[test]
    fn any_state_marker_is_reserved_star() {
        assert_eq!(ANY_STATE, "*");
    }
}
