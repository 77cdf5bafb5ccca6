use std::collections::VecDeque;

use wayfind_core::{Cell, Diagnostics, TileMap};
use wayfind_paths::NavigationMap;

use crate::actor::{Actor, Direction};

/// Everything a behaviour may read or change on a tick: the actor, the map
/// it navigates, and pending manual commands.
///
/// This is the context type of the agent's state machine.
pub struct AgentWorld {
    pub actor: Actor,
    pub nav: NavigationMap<TileMap>,
    pub commands: VecDeque<Direction>,
}

impl AgentWorld {
    pub fn new(actor: Actor, nav: NavigationMap<TileMap>) -> Self {
        Self {
            actor,
            nav,
            commands: VecDeque::new(),
        }
    }

    /// Grid cell the actor currently stands in.
    pub fn actor_cell(&self) -> Cell {
        self.nav.cell_at(self.actor.position)
    }

    /// Graph node closest to the actor, or [`Cell::NONE`].
    pub fn actor_node(&self) -> Cell {
        self.nav.closest_node_to_position(self.actor.position)
    }

    /// Place the actor at the center of `cell`.
    pub fn place_actor(&mut self, cell: Cell) {
        self.actor.position = self.nav.cell_center(cell);
    }

    pub fn push_command(&mut self, dir: Direction) {
        self.commands.push_back(dir);
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        self.nav.diagnostics()
    }
}
