use std::fmt;

/// Handle to a state registered in a [`FiniteStateMachine`].
///
/// Handles are only meaningful for the machine that issued them.
///
/// [`FiniteStateMachine`]: crate::FiniteStateMachine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) u32);

impl StateId {
    /// Position of the state in its machine's arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A state of a [`FiniteStateMachine`] driving a context of type `C`.
///
/// The lifecycle is:
///
/// 1. `on_enter` once when the machine switches to this state,
/// 2. `perform_action` on every tick while it is current,
/// 3. `on_exit` once when the machine switches away.
///
/// Switching to the state that is already current exits and re-enters it.
///
/// [`FiniteStateMachine`]: crate::FiniteStateMachine
pub trait FsmState<C> {
    /// Name used for lookup and diagnostics. Unique within a machine.
    fn name(&self) -> &str;

    fn on_enter(&mut self, _ctx: &mut C) {}

    fn on_exit(&mut self, _ctx: &mut C) {}

    /// Per-tick behaviour, run after transitions have been evaluated.
    fn perform_action(&mut self, ctx: &mut C);
}
