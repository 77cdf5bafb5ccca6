use std::fmt;
use std::rc::Rc;

use wayfind_core::{Category, Diagnostics};

use crate::state::{FsmState, StateId};
use crate::transition::Transition;

struct Slot<C> {
    state: Box<dyn FsmState<C>>,
    transitions: Vec<Rc<Transition<C>>>,
}

/// A finite state machine over a context of type `C`.
///
/// The machine owns its states and their outgoing transitions. The context
/// is owned by the caller and lent to every hook and guard, so states never
/// hold references to each other or to the world they act on.
///
/// Misuse (an unknown state handle, a duplicate state name) is reported to
/// the [`Diagnostics`] context under [`Category::Fsm`] and leaves the
/// machine unchanged.
pub struct FiniteStateMachine<C> {
    slots: Vec<Slot<C>>,
    universal: Vec<Rc<Transition<C>>>,
    current: Option<StateId>,
    diag: Diagnostics,
}

impl<C> FiniteStateMachine<C> {
    pub fn new(diag: Diagnostics) -> Self {
        Self {
            slots: Vec::new(),
            universal: Vec::new(),
            current: None,
            diag,
        }
    }

    /// Register a state with no outgoing transitions.
    pub fn add_state<S: FsmState<C> + 'static>(&mut self, state: S) -> Result<StateId, FsmError> {
        self.add_state_with(state, Vec::<Rc<Transition<C>>>::new())
    }

    /// Register a state together with its ordered outgoing transitions.
    ///
    /// Fails if a state with the same name is already registered.
    pub fn add_state_with<S, I, T>(&mut self, state: S, transitions: I) -> Result<StateId, FsmError>
    where
        S: FsmState<C> + 'static,
        I: IntoIterator<Item = T>,
        T: Into<Rc<Transition<C>>>,
    {
        if self.state_id(state.name()).is_some() {
            let err = FsmError::AlreadyRegistered(state.name().to_string());
            self.diag.error(Category::Fsm, err.to_string());
            return Err(err);
        }
        let id = StateId(self.slots.len() as u32);
        self.slots.push(Slot {
            state: Box::new(state),
            transitions: transitions.into_iter().map(Into::into).collect(),
        });
        Ok(id)
    }

    /// Append a transition to the end of `from`'s list.
    pub fn add_transition(
        &mut self,
        from: StateId,
        transition: impl Into<Rc<Transition<C>>>,
    ) -> Result<(), FsmError> {
        match self.slots.get_mut(from.index()) {
            Some(slot) => {
                slot.transitions.push(transition.into());
                Ok(())
            }
            None => Err(self.unknown(from)),
        }
    }

    /// Add a transition evaluated on every tick before the current state's
    /// own transitions.
    ///
    /// Returns false if this very transition (same allocation) was already
    /// added.
    pub fn add_universal_transition(&mut self, transition: Rc<Transition<C>>) -> bool {
        if self.universal.iter().any(|t| Rc::ptr_eq(t, &transition)) {
            log::debug!(
                target: Category::Fsm.target(),
                "ignoring duplicate universal transition to {}",
                transition.target()
            );
            return false;
        }
        self.universal.push(transition);
        true
    }

    /// Exit the current state, if any, and enter `id`.
    ///
    /// An unregistered `id` is rejected and the current state is kept.
    pub fn set_current_state(&mut self, id: StateId, ctx: &mut C) -> Result<(), FsmError> {
        if id.index() >= self.slots.len() {
            return Err(self.unknown(id));
        }
        let mut from = "(none)".to_string();
        if let Some(cur) = self.current {
            if let Some(slot) = self.slots.get_mut(cur.index()) {
                slot.state.on_exit(ctx);
            }
            from = self.name_of(cur).to_string();
        }
        self.current = Some(id);
        self.diag.info(
            Category::Fsm,
            format!("state change: {from} -> {}", self.name_of(id)),
        );
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.state.on_enter(ctx);
        }
        Ok(())
    }

    /// Run one step of the machine.
    ///
    /// Universal transitions are tried first, then the current state's, in
    /// insertion order; the first whose guard holds fires. A fired
    /// transition to another state switches to it. The current state then
    /// performs its action, whether or not anything fired.
    ///
    /// Returns the state entered on this tick, if any.
    pub fn tick(&mut self, ctx: &mut C) -> Option<StateId> {
        let Some(current) = self.current else {
            self.diag
                .warn(Category::Fsm, "tick ignored: no current state has been set");
            return None;
        };

        let fired = {
            let view: &C = ctx;
            let local = self
                .slots
                .get(current.index())
                .map_or(&[][..], |s| s.transitions.as_slice());
            self.universal
                .iter()
                .chain(local)
                .find(|t| t.is_satisfied(view))
                .map(|t| t.target())
        };
        log::trace!(target: Category::Fsm.target(), "tick in {}: fired {:?}", self.name_of(current), fired);

        let entered = match fired {
            Some(target) if target != current => {
                self.set_current_state(target, ctx).ok().map(|()| target)
            }
            _ => None,
        };

        if let Some(slot) = self.current.and_then(|id| self.slots.get_mut(id.index())) {
            slot.state.perform_action(ctx);
        }
        entered
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.current.map(|id| self.name_of(id))
    }

    pub fn state(&self, id: StateId) -> Option<&dyn FsmState<C>> {
        self.slots.get(id.index()).map(|s| s.state.as_ref())
    }

    pub fn state_mut(&mut self, id: StateId) -> Option<&mut dyn FsmState<C>> {
        let slot = self.slots.get_mut(id.index())?;
        Some(slot.state.as_mut())
    }

    /// Handle of the state registered under `name`.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.slots
            .iter()
            .position(|s| s.state.name() == name)
            .map(|i| StateId(i as u32))
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of transitions leaving `id`, universal ones excluded.
    pub fn transition_count(&self, id: StateId) -> usize {
        self.slots.get(id.index()).map_or(0, |s| s.transitions.len())
    }

    pub fn universal_count(&self) -> usize {
        self.universal.len()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    fn name_of(&self, id: StateId) -> &str {
        self.slots.get(id.index()).map_or("?", |s| s.state.name())
    }

    fn unknown(&self, id: StateId) -> FsmError {
        let err = FsmError::UnknownState(id);
        self.diag.error(Category::Fsm, err.to_string());
        err
    }
}

impl<C> fmt::Debug for FiniteStateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.slots.iter().map(|s| s.state.name()).collect();
        f.debug_struct("FiniteStateMachine")
            .field("states", &names)
            .field("universal", &self.universal.len())
            .field("current", &self.current_state_name())
            .finish()
    }
}

/// Errors reported by [`FiniteStateMachine`] registration and state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsmError {
    /// A state with this name is already registered.
    AlreadyRegistered(String),
    /// The handle does not name a state of this machine.
    UnknownState(StateId),
}

impl fmt::Display for FsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRegistered(name) => {
                write!(f, "state \u{201c}{name}\u{201d} is already registered")
            }
            Self::UnknownState(id) => write!(f, "state {id} is not registered"),
        }
    }
}

impl std::error::Error for FsmError {}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::Severity;

    #[derive(Default)]
    struct World {
        x: i32,
        events: Vec<String>,
    }

    struct Recording(&'static str);

    impl FsmState<World> for Recording {
        fn name(&self) -> &str {
            self.0
        }
        fn on_enter(&mut self, w: &mut World) {
            w.events.push(format!("enter {}", self.0));
        }
        fn on_exit(&mut self, w: &mut World) {
            w.events.push(format!("exit {}", self.0));
        }
        fn perform_action(&mut self, w: &mut World) {
            w.events.push(format!("act {}", self.0));
        }
    }

    fn abc() -> (FiniteStateMachine<World>, [StateId; 3]) {
        let mut fsm = FiniteStateMachine::new(Diagnostics::new());
        let a = fsm.add_state(Recording("A")).unwrap();
        let b = fsm.add_state(Recording("B")).unwrap();
        let c = fsm.add_state(Recording("C")).unwrap();
        fsm.add_transition(a, Transition::new(b, |w: &World| w.x > 0))
            .unwrap();
        fsm.add_transition(b, Transition::new(a, |w: &World| w.x < 0))
            .unwrap();
        fsm.add_transition(b, Transition::new(c, |w: &World| w.x > 0))
            .unwrap();
        fsm.add_universal_transition(Rc::new(Transition::new(a, |w: &World| w.x < 0)));
        (fsm, [a, b, c])
    }

    #[test]
    fn a_to_b_to_c_and_back_to_a() {
        let (mut fsm, [a, b, c]) = abc();
        let mut w = World { x: 3, ..World::default() };
        fsm.set_current_state(a, &mut w).unwrap();

        assert_eq!(fsm.tick(&mut w), Some(b));
        assert_eq!(fsm.tick(&mut w), Some(c));
        w.x = -5;
        assert_eq!(fsm.tick(&mut w), Some(a));
        assert_eq!(fsm.current_state_name(), Some("A"));
    }

    #[test]
    fn hooks_run_in_order_and_action_follows_the_change() {
        let (mut fsm, [a, ..]) = abc();
        let mut w = World { x: 1, ..World::default() };
        fsm.set_current_state(a, &mut w).unwrap();
        fsm.tick(&mut w);
        assert_eq!(w.events, ["enter A", "exit A", "enter B", "act B"]);
    }

    #[test]
    fn action_runs_when_nothing_fires() {
        let (mut fsm, [a, ..]) = abc();
        let mut w = World::default();
        fsm.set_current_state(a, &mut w).unwrap();
        assert_eq!(fsm.tick(&mut w), None);
        assert_eq!(fsm.tick(&mut w), None);
        assert_eq!(w.events, ["enter A", "act A", "act A"]);
    }

    #[test]
    fn universal_transitions_take_priority() {
        let mut fsm = FiniteStateMachine::new(Diagnostics::new());
        let a = fsm.add_state(Recording("A")).unwrap();
        let b = fsm.add_state(Recording("B")).unwrap();
        let c = fsm.add_state(Recording("C")).unwrap();
        fsm.add_transition(a, Transition::always(b)).unwrap();
        fsm.add_universal_transition(Rc::new(Transition::new(c, |w: &World| w.x == 7)));

        let mut w = World { x: 7, ..World::default() };
        fsm.set_current_state(a, &mut w).unwrap();
        assert_eq!(fsm.tick(&mut w), Some(c));
    }

    #[test]
    fn fired_transition_to_current_state_does_not_reenter() {
        let mut fsm = FiniteStateMachine::new(Diagnostics::new());
        let a = fsm.add_state(Recording("A")).unwrap();
        let b = fsm.add_state(Recording("B")).unwrap();
        // The universal self-loop wins and shadows A -> B.
        fsm.add_universal_transition(Rc::new(Transition::always(a)));
        fsm.add_transition(a, Transition::always(b)).unwrap();
        let mut w = World::default();
        fsm.set_current_state(a, &mut w).unwrap();
        assert_eq!(fsm.tick(&mut w), None);
        assert_eq!(w.events, ["enter A", "act A"]);
    }

    #[test]
    fn setting_the_current_state_again_reenters_it() {
        let (mut fsm, [a, ..]) = abc();
        let mut w = World::default();
        fsm.set_current_state(a, &mut w).unwrap();
        fsm.set_current_state(a, &mut w).unwrap();
        assert_eq!(w.events, ["enter A", "exit A", "enter A"]);
    }

    #[test]
    fn unregistered_state_is_rejected() {
        let (mut fsm, [a, ..]) = abc();
        let mut w = World::default();
        fsm.set_current_state(a, &mut w).unwrap();
        let stray = StateId(42);
        assert_eq!(
            fsm.set_current_state(stray, &mut w),
            Err(FsmError::UnknownState(stray))
        );
        assert_eq!(fsm.current_state(), Some(a));
        assert_eq!(fsm.diagnostics().count(Category::Fsm, Severity::Error), 1);
        assert_eq!(w.events, ["enter A"]);
    }

    #[test]
    fn transition_to_unregistered_target_keeps_state_and_acts() {
        let mut fsm = FiniteStateMachine::new(Diagnostics::new());
        let a = fsm.add_state(Recording("A")).unwrap();
        fsm.add_transition(a, Transition::always(StateId(9))).unwrap();
        let mut w = World::default();
        fsm.set_current_state(a, &mut w).unwrap();
        assert_eq!(fsm.tick(&mut w), None);
        assert_eq!(fsm.current_state(), Some(a));
        assert_eq!(w.events, ["enter A", "act A"]);
        assert_eq!(fsm.diagnostics().count(Category::Fsm, Severity::Error), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut fsm = FiniteStateMachine::<World>::new(Diagnostics::new());
        fsm.add_state(Recording("A")).unwrap();
        assert_eq!(
            fsm.add_state(Recording("A")),
            Err(FsmError::AlreadyRegistered("A".into()))
        );
        assert_eq!(fsm.len(), 1);
        assert_eq!(fsm.diagnostics().count(Category::Fsm, Severity::Error), 1);
    }

    #[test]
    fn universal_duplicates_are_detected_by_identity() {
        let mut fsm = FiniteStateMachine::<World>::new(Diagnostics::new());
        let a = fsm.add_state(Recording("A")).unwrap();
        let t = Rc::new(Transition::always(a));
        assert!(fsm.add_universal_transition(Rc::clone(&t)));
        assert!(!fsm.add_universal_transition(t));
        // An equal but separate transition is a different edge.
        assert!(fsm.add_universal_transition(Rc::new(Transition::always(a))));
        assert_eq!(fsm.universal_count(), 2);
    }

    #[test]
    fn shared_transitions_and_lookup() {
        let mut fsm = FiniteStateMachine::<World>::new(Diagnostics::new());
        let home = fsm.add_state(Recording("home")).unwrap();
        let back = Rc::new(Transition::new(home, |w: &World| w.x < 0));
        let away = fsm
            .add_state_with(Recording("away"), [Rc::clone(&back)])
            .unwrap();
        let far = fsm.add_state_with(Recording("far"), [back]).unwrap();
        assert_eq!(fsm.transition_count(away), 1);
        assert_eq!(fsm.transition_count(far), 1);
        assert_eq!(fsm.transition_count(home), 0);
        assert_eq!(fsm.state_id("far"), Some(far));
        assert_eq!(fsm.state(away).map(|s| s.name()), Some("away"));
        assert_eq!(fsm.state_id("nowhere"), None);
        assert!(fsm.add_transition(StateId(5), Transition::always(home)).is_err());
    }

    #[test]
    fn tick_without_current_state_warns() {
        let (mut fsm, _) = abc();
        let mut w = World::default();
        assert_eq!(fsm.tick(&mut w), None);
        assert!(w.events.is_empty());
        assert_eq!(fsm.diagnostics().count(Category::Fsm, Severity::Warning), 1);
    }
}
