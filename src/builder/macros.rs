//! Macros for ergonomic state declaration.

/// Declare a unit struct implementing [`State`](crate::core::State) for any
/// context.
///
/// The generated state has no hooks. Add `initial: "Child"` to make it a
/// compound state expanding to `Child`.
///
/// # Example
///
/// ```
/// use layerfsm::core::State;
/// use layerfsm::define_state;
///
/// define_state! {
///     /// Parent of every movement state
///     pub struct Locomotion => "Locomotion", initial: "Walking"
/// }
/// define_state! { pub struct Walking => "Walking" }
///
/// assert!(State::<()>::is_compound(&Locomotion));
/// assert_eq!(State::<()>::initial_sub_state(&Locomotion), Some("Walking"));
/// assert!(!State::<()>::is_compound(&Walking));
/// ```
#[macro_export]
macro_rules! define_state {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $id:literal, initial: $initial:literal $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name;

        impl<C> $crate::core::State<C> for $name {
            fn id(&self) -> &str {
                $id
            }

            fn is_compound(&self) -> bool {
                true
            }

            fn initial_sub_state(&self) -> Option<&str> {
                Some($initial)
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $id:literal $(,)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name;

        impl<C> $crate::core::State<C> for $name {
            fn id(&self) -> &str {
                $id
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    define_state! { struct Leaf => "Leaf" }
    define_state! { struct Group => "Group", initial: "Leaf" }

    #[test]
    fn leaf_macro_generates_trait() {
        let leaf = Leaf;
        assert_eq!(State::<()>::id(&leaf), "Leaf");
        assert!(!State::<()>::is_compound(&leaf));
        assert_eq!(State::<()>::initial_sub_state(&leaf), None);
    }

    #[test]
    fn compound_macro_generates_trait() {
        let group = Group;
        assert_eq!(State::<u32>::id(&group), "Group");
        assert!(State::<u32>::is_compound(&group));
        assert_eq!(State::<u32>::initial_sub_state(&group), Some("Leaf"));
    }

    #[test]
    fn define_state_supports_visibility_and_docs() {
        define_state! {
            /// Documented public state
            pub struct PublicState => "Public"
        }

        let _state = PublicState;
        assert_eq!(State::<()>::id(&PublicState), "Public");
    }
}
