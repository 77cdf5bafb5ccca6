//! Autonomous actor behaviours for grid worlds.
//!
//! An [`Agent`] couples a [`FiniteStateMachine`](wayfind_fsm::FiniteStateMachine)
//! of [`Behavior`] states with the [`AgentWorld`] they act on: one actor, the
//! navigation map it moves over, and a queue of manual commands. Each tick
//! the machine picks a behaviour from the world's state (stuck, arrived,
//! commands pending) and the behaviour moves the actor a little further
//! along its current path.

mod actor;
mod agent;
mod behavior;
pub mod conditions;
mod follow;
mod world;

pub use actor::{Actor, Direction};
pub use agent::{Agent, PatrolStates};
pub use behavior::Behavior;
pub use follow::{FollowStatus, NoPathPolicy, PathEndPolicy, PathFollower, follow_path};
pub use world::AgentWorld;
