use wayfind_core::{Category, Cell};
use wayfind_fsm::FsmState;
use wayfind_paths::Path;

use crate::follow::{NoPathPolicy, PathEndPolicy, PathFollower, follow_path};
use crate::world::AgentWorld;

/// The auto-control behaviours an actor can be in.
///
/// Each variant is a state of the agent's machine; its name is the variant
/// name, so a machine holds at most one state of each kind.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Do nothing.
    Idle,
    /// Report `message` on entry, then do nothing.
    Error { message: String },
    /// Loop forever along the closed route through `waypoints`, starting
    /// from wherever the actor stands on it. The start is an exact match of
    /// the actor's node on the route; an actor off the route gets stuck.
    AutoPatrol {
        waypoints: Vec<Cell>,
        follower: PathFollower,
    },
    /// Walk to the patrol waypoint closest to the actor.
    AutoFindPatrol {
        waypoints: Vec<Cell>,
        follower: PathFollower,
    },
    /// Walk to `destination`, teleporting there if no path exists.
    AutoMoveToPoint {
        destination: Cell,
        follower: PathFollower,
    },
    /// Step one cell per queued command.
    ManualControl,
}

impl Behavior {
    pub fn error(message: impl Into<String>) -> Self {
        Behavior::Error {
            message: message.into(),
        }
    }

    pub fn auto_patrol(waypoints: Vec<Cell>) -> Self {
        Behavior::AutoPatrol {
            waypoints,
            follower: PathFollower::none(),
        }
    }

    pub fn auto_find_patrol(waypoints: Vec<Cell>) -> Self {
        Behavior::AutoFindPatrol {
            waypoints,
            follower: PathFollower::none(),
        }
    }

    pub fn move_to(destination: Cell) -> Self {
        Behavior::AutoMoveToPoint {
            destination,
            follower: PathFollower::none(),
        }
    }

    /// The path being followed, for path-following behaviours.
    pub fn follower(&self) -> Option<&PathFollower> {
        match self {
            Behavior::AutoPatrol { follower, .. }
            | Behavior::AutoFindPatrol { follower, .. }
            | Behavior::AutoMoveToPoint { follower, .. } => Some(follower),
            _ => None,
        }
    }
}

impl FsmState<AgentWorld> for Behavior {
    fn name(&self) -> &str {
        match self {
            Behavior::Idle => "Idle",
            Behavior::Error { .. } => "Error",
            Behavior::AutoPatrol { .. } => "AutoPatrol",
            Behavior::AutoFindPatrol { .. } => "AutoFindPatrol",
            Behavior::AutoMoveToPoint { .. } => "AutoMoveToPoint",
            Behavior::ManualControl => "ManualControl",
        }
    }

    fn on_enter(&mut self, world: &mut AgentWorld) {
        match self {
            Behavior::Idle => {}
            Behavior::Error { message } => {
                world
                    .diagnostics()
                    .error(Category::Agent, format!("{}: {message}", world.actor.name));
            }
            Behavior::AutoPatrol {
                waypoints,
                follower,
            } => {
                world.actor.stuck = false;
                *follower = plan_patrol(world, waypoints);
            }
            Behavior::AutoFindPatrol {
                waypoints,
                follower,
            } => {
                world.actor.stuck = false;
                let start = world.actor_node();
                *follower = match closest_waypoint(waypoints, start) {
                    Some(target) => plan_path(world, start, target),
                    None => PathFollower::none(),
                };
            }
            Behavior::AutoMoveToPoint {
                destination,
                follower,
            } => {
                world.actor.stuck = false;
                let start = world.actor_node();
                *follower = plan_path(world, start, *destination);
            }
            Behavior::ManualControl => {
                world.actor.stuck = false;
                let node = world.actor_node();
                if !node.is_none() {
                    world.place_actor(node);
                }
            }
        }
    }

    fn on_exit(&mut self, _world: &mut AgentWorld) {
        if let Behavior::AutoPatrol { follower, .. }
        | Behavior::AutoFindPatrol { follower, .. }
        | Behavior::AutoMoveToPoint { follower, .. } = self
        {
            follower.clear();
        }
    }

    fn perform_action(&mut self, world: &mut AgentWorld) {
        match self {
            Behavior::Idle | Behavior::Error { .. } => {}
            Behavior::AutoPatrol { follower, .. } => {
                follow_path(world, follower, PathEndPolicy::Wrap, NoPathPolicy::MarkStuck);
            }
            Behavior::AutoFindPatrol { follower, .. } => {
                follow_path(world, follower, PathEndPolicy::Stop, NoPathPolicy::MarkStuck);
            }
            Behavior::AutoMoveToPoint { follower, .. } => {
                follow_path(world, follower, PathEndPolicy::Stop, NoPathPolicy::Teleport);
            }
            Behavior::ManualControl => manual_step(world),
        }
    }
}

/// Follow the cyclic route through `waypoints` from the actor's node.
///
/// An actor whose node is not on the route gets no path.
fn plan_patrol(world: &mut AgentWorld, waypoints: &[Cell]) -> PathFollower {
    // Failures are reported by the route calculator.
    let Ok(route) = world.nav.cyclic_route(waypoints) else {
        return PathFollower::none();
    };
    let first = waypoints.first().copied().unwrap_or(Cell::NONE);
    let start = world.actor_node();
    match route.path().index_of(start) {
        Some(i) => PathFollower::new(route.path().clone(), first).starting_at(i),
        None => {
            world.diagnostics().warn(
                Category::Agent,
                format!("{} at {start} is not on its patrol route", world.actor.name),
            );
            PathFollower::none()
        }
    }
}

fn plan_path(world: &mut AgentWorld, start: Cell, dest: Cell) -> PathFollower {
    if start.is_none() {
        return PathFollower::new(Path::EMPTY, dest);
    }
    if start == dest {
        return PathFollower::new(Path::single(start), dest);
    }
    PathFollower::new(world.nav.path(start, dest), dest)
}

/// The waypoint nearest to `from`, earliest first on ties.
fn closest_waypoint(waypoints: &[Cell], from: Cell) -> Option<Cell> {
    if from.is_none() {
        return None;
    }
    waypoints
        .iter()
        .copied()
        .min_by_key(|w| w.distance_squared(from))
}

fn manual_step(world: &mut AgentWorld) {
    let Some(dir) = world.commands.pop_front() else {
        return;
    };
    let from = world.actor_cell();
    let to = dir.step(from);
    if world.nav.graph().contains_node(to) {
        world.place_actor(to);
    } else {
        world.diagnostics().info(
            Category::Agent,
            format!("{} cannot move {dir} from {from}", world.actor.name),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::{Diagnostics, NavConfig, Severity, TileMap, Vec2};
    use wayfind_paths::NavigationMap;

    use crate::actor::{Actor, Direction};

    const LOOP: &str = "\
#######
#.....#
#.###.#
#.....#
#######";

    fn world(at: Cell) -> AgentWorld {
        let nav = NavigationMap::new(
            TileMap::parse(LOOP).unwrap(),
            NavConfig::default(),
            Diagnostics::new(),
        );
        let mut w = AgentWorld::new(Actor::new("guard", Vec2::ZERO), nav);
        w.place_actor(at);
        w
    }

    #[test]
    fn patrol_starts_where_the_actor_stands() {
        let mut w = world(Cell::new(5, 1));
        let mut b = Behavior::auto_patrol(vec![Cell::new(1, 1), Cell::new(5, 1)]);
        b.on_enter(&mut w);
        let f = b.follower().unwrap();
        assert_eq!(f.index(), 4);
        assert_eq!(f.next_cell(), Some(Cell::new(5, 1)));
        assert_eq!(f.path().first(), f.path().last());
    }

    #[test]
    fn patrol_off_route_marks_stuck() {
        // (1, 2) lies on the left side, not on the route's top-right loop.
        let mut w = world(Cell::new(1, 2));
        let mut b = Behavior::auto_patrol(vec![Cell::new(1, 1), Cell::new(5, 1)]);
        b.on_enter(&mut w);
        assert!(b.follower().unwrap().path().is_empty());
        b.perform_action(&mut w);
        assert!(w.actor.stuck);
        assert_eq!(w.diagnostics().count(Category::Agent, Severity::Warning), 2);
    }

    #[test]
    fn find_patrol_targets_the_closest_waypoint() {
        let mut w = world(Cell::new(4, 3));
        let mut b = Behavior::auto_find_patrol(vec![Cell::new(1, 1), Cell::new(5, 3)]);
        b.on_enter(&mut w);
        let f = b.follower().unwrap();
        assert_eq!(f.destination(), Cell::new(5, 3));
        assert_eq!(f.path().len(), 2);
    }

    #[test]
    fn move_to_own_cell_is_a_single_point_path() {
        let mut w = world(Cell::new(3, 1));
        let mut b = Behavior::move_to(Cell::new(3, 1));
        b.on_enter(&mut w);
        assert_eq!(b.follower().unwrap().path().cells(), &[Cell::new(3, 1)]);
        assert_eq!(w.diagnostics().count_severity(Severity::Warning), 0);
    }

    #[test]
    fn exit_clears_the_path() {
        let mut w = world(Cell::new(1, 1));
        let mut b = Behavior::move_to(Cell::new(5, 3));
        b.on_enter(&mut w);
        assert!(!b.follower().unwrap().path().is_empty());
        b.on_exit(&mut w);
        assert!(b.follower().unwrap().path().is_empty());
    }

    #[test]
    fn manual_control_moves_only_onto_nodes() {
        let mut w = world(Cell::new(1, 1));
        w.actor.position = w.actor.position + Vec2::new(0.3, 0.2);
        let mut b = Behavior::ManualControl;
        b.on_enter(&mut w);
        assert_eq!(w.actor.position, w.nav.cell_center(Cell::new(1, 1)));

        w.push_command(Direction::Right);
        w.push_command(Direction::Down);
        b.perform_action(&mut w);
        assert_eq!(w.actor_cell(), Cell::new(2, 1));
        b.perform_action(&mut w);
        // (2, 2) is part of the inner wall.
        assert_eq!(w.actor_cell(), Cell::new(2, 1));
        assert!(w.commands.is_empty());
        assert_eq!(w.diagnostics().count(Category::Agent, Severity::Info), 1);
    }

    #[test]
    fn error_reports_on_entry() {
        let mut w = world(Cell::new(1, 1));
        let mut b = Behavior::error("lost");
        b.on_enter(&mut w);
        b.perform_action(&mut w);
        let errors: Vec<_> = w
            .diagnostics()
            .reports()
            .into_iter()
            .filter(|r| r.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "guard: lost");
    }
}
