use std::fmt;

use crate::state::StateId;

/// A guarded edge to a target state.
///
/// The condition reads the machine's context and must not have side
/// effects on it: it may be evaluated on ticks where it does not fire.
pub struct Transition<C> {
    target: StateId,
    condition: Box<dyn Fn(&C) -> bool>,
}

impl<C> Transition<C> {
    pub fn new(target: StateId, condition: impl Fn(&C) -> bool + 'static) -> Self {
        Self {
            target,
            condition: Box::new(condition),
        }
    }

    /// A transition whose condition always holds.
    pub fn always(target: StateId) -> Self {
        Self::new(target, |_| true)
    }

    pub fn target(&self) -> StateId {
        self.target
    }

    /// Evaluate the guard against `ctx`.
    pub fn is_satisfied(&self, ctx: &C) -> bool {
        (self.condition)(ctx)
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
