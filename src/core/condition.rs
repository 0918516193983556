//! Transition conditions.
//!
//! Conditions are boolean predicates over the machine context. A transition
//! fires only when its condition (if any) evaluates to `true`.

use std::fmt;

/// Predicate over the machine context that gates a transition.
///
/// # Example
///
/// ```rust
/// use layerfsm::core::Condition;
///
/// struct Motion {
///     speed: f32,
/// }
///
/// let moving = Condition::new(|m: &Motion| m.speed > 0.0);
///
/// assert!(moving.evaluate(&Motion { speed: 5.0 }));
/// assert!(!moving.evaluate(&Motion { speed: 0.0 }));
/// ```
pub struct Condition<C> {
    predicate: Box<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Condition<C> {
    /// Create a condition from a predicate closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Condition {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the condition against the current context.
    pub fn evaluate(&self, context: &C) -> bool {
        (self.predicate)(context)
    }

    /// Condition that holds when both `self` and `other` hold.
    ///
    /// `other` is not evaluated when `self` is false.
    pub fn and(self, other: Condition<C>) -> Self
    where
        C: 'static,
    {
        Condition::new(move |ctx: &C| self.evaluate(ctx) && other.evaluate(ctx))
    }

    /// Condition that holds when `self` does not.
    pub fn negate(self) -> Self
    where
        C: 'static,
    {
        Condition::new(move |ctx: &C| !self.evaluate(ctx))
    }
}

impl<C> fmt::Debug for Condition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}
