use std::rc::Rc;

use wayfind_core::Cell;
use wayfind_fsm::{FiniteStateMachine, FsmError, StateId, Transition};

use crate::behavior::Behavior;
use crate::conditions;
use crate::world::AgentWorld;

/// Handles of the states wired by [`Agent::patroller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolStates {
    pub find_patrol: StateId,
    pub patrol: StateId,
    pub manual: StateId,
    pub stuck: StateId,
}

/// An actor's world together with the state machine that drives it.
pub struct Agent {
    fsm: FiniteStateMachine<AgentWorld>,
    world: AgentWorld,
}

impl Agent {
    /// Combine a machine built by the caller with its world.
    ///
    /// The machine has no current state until [`Agent::start`].
    pub fn new(fsm: FiniteStateMachine<AgentWorld>, world: AgentWorld) -> Self {
        Self { fsm, world }
    }

    /// A patrolling guard.
    ///
    /// The guard first walks to the nearest waypoint, then loops along the
    /// closed route through all of them. Queued manual commands take over
    /// at any time; once they run out the guard heads back to its route.
    /// An actor that cannot reach its route ends up in the error state
    /// until manual control moves it.
    pub fn patroller(world: AgentWorld, waypoints: Vec<Cell>) -> Result<(Self, PatrolStates), FsmError> {
        let mut fsm = FiniteStateMachine::new(world.diagnostics().clone());
        let find_patrol = fsm.add_state(Behavior::auto_find_patrol(waypoints.clone()))?;
        let patrol = fsm.add_state(Behavior::auto_patrol(waypoints.clone()))?;
        let manual = fsm.add_state(Behavior::ManualControl)?;
        let stuck = fsm.add_state(Behavior::error("cannot reach the patrol route"))?;

        fsm.add_transition(
            find_patrol,
            Transition::new(patrol, conditions::has_arrived_at_any(waypoints)),
        )?;
        fsm.add_transition(manual, Transition::new(find_patrol, conditions::no_commands()))?;
        fsm.add_universal_transition(Rc::new(Transition::new(manual, conditions::has_commands())));
        fsm.add_universal_transition(Rc::new(Transition::new(stuck, conditions::is_stuck())));

        let mut agent = Self::new(fsm, world);
        agent.start(find_patrol)?;
        let states = PatrolStates {
            find_patrol,
            patrol,
            manual,
            stuck,
        };
        Ok((agent, states))
    }

    /// An actor that walks to `destination` and idles there.
    ///
    /// If no path exists the actor is teleported.
    pub fn courier(world: AgentWorld, destination: Cell) -> Result<Self, FsmError> {
        let mut fsm = FiniteStateMachine::new(world.diagnostics().clone());
        let idle = fsm.add_state(Behavior::Idle)?;
        let moving = fsm.add_state_with(
            Behavior::move_to(destination),
            [Transition::new(idle, conditions::has_arrived(destination))],
        )?;
        let mut agent = Self::new(fsm, world);
        agent.start(moving)?;
        Ok(agent)
    }

    /// Enter `state`, leaving the current one.
    pub fn start(&mut self, state: StateId) -> Result<(), FsmError> {
        self.fsm.set_current_state(state, &mut self.world)
    }

    /// Run one tick. Returns the state entered, if the machine switched.
    pub fn tick(&mut self) -> Option<StateId> {
        self.fsm.tick(&mut self.world)
    }

    pub fn state_name(&self) -> Option<&str> {
        self.fsm.current_state_name()
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.fsm.current_state()
    }

    pub fn world(&self) -> &AgentWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut AgentWorld {
        &mut self.world
    }

    pub fn fsm(&self) -> &FiniteStateMachine<AgentWorld> {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut FiniteStateMachine<AgentWorld> {
        &mut self.fsm
    }
}
