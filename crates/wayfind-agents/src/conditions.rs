//! Ready-made transition guards over an [`AgentWorld`].
//!
//! ```
//! # use wayfind_core::Cell;
//! # use wayfind_fsm::{StateId, Transition};
//! # use wayfind_agents::{AgentWorld, conditions};
//! # fn wire(error: StateId) -> Transition<AgentWorld> {
//! Transition::new(error, conditions::is_stuck())
//! # }
//! ```

use wayfind_core::Cell;
use wayfind_paths::manhattan;

use crate::world::AgentWorld;

/// The actor has been flagged stuck.
pub fn is_stuck() -> impl Fn(&AgentWorld) -> bool + 'static {
    |w: &AgentWorld| w.actor.stuck
}

/// The actor is within the arrival threshold of the center of `dest`.
pub fn has_arrived(dest: Cell) -> impl Fn(&AgentWorld) -> bool + 'static {
    move |w: &AgentWorld| arrived(w, dest)
}

/// The actor is within the arrival threshold of any of `cells`.
pub fn has_arrived_at_any(cells: Vec<Cell>) -> impl Fn(&AgentWorld) -> bool + 'static {
    move |w: &AgentWorld| cells.iter().any(|&c| arrived(w, c))
}

/// The actor's cell is at most `radius` steps from `cell`.
pub fn near_cell(cell: Cell, radius: i32) -> impl Fn(&AgentWorld) -> bool + 'static {
    move |w: &AgentWorld| manhattan(w.actor_cell(), cell) <= radius
}

/// Manual commands are waiting.
pub fn has_commands() -> impl Fn(&AgentWorld) -> bool + 'static {
    |w: &AgentWorld| !w.commands.is_empty()
}

/// No manual command is waiting.
pub fn no_commands() -> impl Fn(&AgentWorld) -> bool + 'static {
    |w: &AgentWorld| w.commands.is_empty()
}

fn arrived(w: &AgentWorld, dest: Cell) -> bool {
    w.actor.position.distance_squared(w.nav.cell_center(dest))
        <= w.nav.config().arrival_threshold_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::{Diagnostics, NavConfig, TileMap, Vec2};
    use wayfind_paths::NavigationMap;

    use crate::actor::{Actor, Direction};

    fn world() -> AgentWorld {
        let nav = NavigationMap::new(
            TileMap::parse(".....").unwrap(),
            NavConfig::default(),
            Diagnostics::new(),
        );
        AgentWorld::new(Actor::new("a", Vec2::new(1.5, 0.5)), nav)
    }

    #[test]
    fn arrival_uses_the_threshold() {
        let mut w = world();
        let here = Cell::new(1, 0);
        assert!(has_arrived(here)(&w));
        w.actor.position = Vec2::new(1.55, 0.5);
        assert!(has_arrived(here)(&w));
        w.actor.position = Vec2::new(1.8, 0.5);
        assert!(!has_arrived(here)(&w));
        let any = has_arrived_at_any(vec![Cell::new(4, 0), Cell::new(2, 0)]);
        assert!(!any(&w));
        w.actor.position = Vec2::new(2.5, 0.5);
        assert!(any(&w));
    }

    #[test]
    fn nearness_and_flags() {
        let mut w = world();
        assert!(near_cell(Cell::new(3, 0), 2)(&w));
        assert!(!near_cell(Cell::new(4, 0), 2)(&w));
        assert!(!is_stuck()(&w));
        w.actor.stuck = true;
        assert!(is_stuck()(&w));
        assert!(no_commands()(&w));
        w.push_command(Direction::Left);
        assert!(has_commands()(&w));
    }
}
