//! Walking an actor along a [`Path`], one tick at a time.

use wayfind_core::{Category, Cell};
use wayfind_paths::Path;

use crate::world::AgentWorld;

/// What happens once the last point of a path has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEndPolicy {
    /// Start over from the first point (closed patrol routes).
    Wrap,
    /// Stay on the last point; arrival is detected by a transition.
    Stop,
}

/// What happens when there is no path to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPathPolicy {
    /// Flag the actor as stuck so a transition can react.
    MarkStuck,
    /// Report the problem once and stand still.
    Log,
    /// Put the actor straight onto the destination node.
    Teleport,
}

/// Result of one [`follow_path`] step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowStatus {
    /// The actor moved towards the next point.
    Moving,
    /// The actor snapped onto this path point.
    Reached(Cell),
    /// The path is done and the end policy is [`PathEndPolicy::Stop`].
    Finished,
    /// There was no path; the no-path policy was applied.
    NoPath,
}

/// A path plus the index of the next point to reach.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    path: Path,
    index: usize,
    destination: Cell,
    reported: bool,
}

impl PathFollower {
    pub fn new(path: Path, destination: Cell) -> Self {
        Self {
            path,
            index: 0,
            destination,
            reported: false,
        }
    }

    /// A follower with no path and no destination.
    pub fn none() -> Self {
        Self::new(Path::EMPTY, Cell::NONE)
    }

    /// Begin at `index` instead of the first point.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn destination(&self) -> Cell {
        self.destination
    }

    /// Path point the actor is heading for, if any.
    pub fn next_cell(&self) -> Option<Cell> {
        self.path.get(self.index)
    }

    pub fn is_finished(&self) -> bool {
        !self.path.is_empty() && self.index >= self.path.len()
    }

    pub fn clear(&mut self) {
        *self = Self::none();
    }
}

/// Advance the actor of `world` one tick along `follower`.
///
/// The actor heads for the follower's next point. Once within the
/// configured arrival threshold it is snapped exactly onto the point and
/// the index advances; running off the end applies `end`. An empty path
/// applies `no_path` instead.
pub fn follow_path(
    world: &mut AgentWorld,
    follower: &mut PathFollower,
    end: PathEndPolicy,
    no_path: NoPathPolicy,
) -> FollowStatus {
    if follower.path.is_empty() {
        return apply_no_path(world, follower, no_path);
    }
    if follower.index >= follower.path.len() {
        match end {
            PathEndPolicy::Wrap => follower.index = wrap_index(&follower.path),
            PathEndPolicy::Stop => return FollowStatus::Finished,
        }
    }
    let Some(cell) = follower.path.get(follower.index) else {
        return FollowStatus::Finished;
    };

    let target = world.nav.cell_center(cell);
    let threshold = world.nav.config().arrival_threshold_squared();
    if world.actor.position.distance_squared(target) <= threshold {
        world.actor.position = target;
        log::trace!(target: Category::Agent.target(), "{} reached {cell}", world.actor.name);
        follower.index += 1;
        if follower.index >= follower.path.len() && end == PathEndPolicy::Wrap {
            follower.index = wrap_index(&follower.path);
        }
        return FollowStatus::Reached(cell);
    }

    world.actor.position = world.actor.position.step_towards(target, world.actor.speed);
    FollowStatus::Moving
}

/// Where a wrapping follower restarts. A closed loop repeats its first cell
/// at the end, and the actor is already standing on it.
fn wrap_index(path: &Path) -> usize {
    if path.len() > 1 && path.first() == path.last() {
        1
    } else {
        0
    }
}

fn apply_no_path(
    world: &mut AgentWorld,
    follower: &mut PathFollower,
    policy: NoPathPolicy,
) -> FollowStatus {
    let dest = follower.destination;
    match policy {
        NoPathPolicy::Teleport if world.nav.graph().contains_node(dest) => {
            world.diagnostics().info(
                Category::Agent,
                format!("{} has no path, teleporting to {dest}", world.actor.name),
            );
            world.place_actor(dest);
            world.actor.stuck = false;
            // Leave a finished one-point path behind so the actor stays put.
            *follower = PathFollower::new(Path::single(dest), dest).starting_at(1);
        }
        NoPathPolicy::Log => {
            if !follower.reported {
                world.diagnostics().warn(
                    Category::Agent,
                    format!("{} has no path to {dest}", world.actor.name),
                );
                follower.reported = true;
            }
        }
        NoPathPolicy::MarkStuck | NoPathPolicy::Teleport => {
            if !follower.reported {
                world.diagnostics().warn(
                    Category::Agent,
                    format!("{} has no path to {dest} and is stuck", world.actor.name),
                );
                follower.reported = true;
            }
            world.actor.stuck = true;
        }
    }
    FollowStatus::NoPath
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::{Diagnostics, NavConfig, Severity, TileMap, Vec2};
    use wayfind_paths::NavigationMap;

    use crate::actor::Actor;

    fn world(layout: &str, at: Cell) -> AgentWorld {
        let nav = NavigationMap::new(
            TileMap::parse(layout).unwrap(),
            NavConfig::default(),
            Diagnostics::new(),
        );
        let mut w = AgentWorld::new(Actor::new("walker", Vec2::ZERO).with_speed(0.5), nav);
        w.place_actor(at);
        w
    }

    fn corridor_path(w: &mut AgentWorld, to: Cell) -> PathFollower {
        let from = w.actor_cell();
        PathFollower::new(w.nav.path(from, to), to)
    }

    #[test]
    fn walks_snaps_and_stops_at_the_end() {
        let mut w = world("....", Cell::new(0, 0));
        let mut f = corridor_path(&mut w, Cell::new(2, 0));
        let mut reached = Vec::new();
        for _ in 0..20 {
            match follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Log) {
                FollowStatus::Reached(c) => reached.push(c),
                FollowStatus::Finished => break,
                FollowStatus::Moving => {}
                FollowStatus::NoPath => panic!("unexpected empty path"),
            }
        }
        assert_eq!(reached, [Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)]);
        assert_eq!(w.actor.position, w.nav.cell_center(Cell::new(2, 0)));
        assert!(f.is_finished());
    }

    #[test]
    fn wrap_restarts_from_the_first_point() {
        let mut w = world("...", Cell::new(0, 0));
        let mut f = corridor_path(&mut w, Cell::new(1, 0));
        let mut reached = Vec::new();
        for _ in 0..12 {
            if let FollowStatus::Reached(c) =
                follow_path(&mut w, &mut f, PathEndPolicy::Wrap, NoPathPolicy::Log)
            {
                reached.push(c);
            }
            assert!(f.index() < f.path().len());
        }
        assert!(reached.len() >= 4);
        assert_eq!(&reached[..3], &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 0)]);
    }

    #[test]
    fn wrap_on_a_closed_loop_skips_the_repeated_start() {
        let mut w = world("..\n..", Cell::new(0, 0));
        let ring = Path::new(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 0),
        ])
        .unwrap();
        let mut f = PathFollower::new(ring, Cell::new(0, 0));
        let mut reached = Vec::new();
        for _ in 0..40 {
            if let FollowStatus::Reached(c) =
                follow_path(&mut w, &mut f, PathEndPolicy::Wrap, NoPathPolicy::Log)
            {
                reached.push(c);
            }
        }
        assert!(reached.len() >= 7);
        assert_eq!(reached[4], Cell::new(0, 0));
        assert_eq!(reached[5], Cell::new(1, 0));
        assert!(reached.windows(2).all(|p| p[0] != p[1]));
    }

    #[test]
    fn step_never_overshoots() {
        let mut w = world("..", Cell::new(0, 0));
        w.actor.speed = 0.3;
        let mut f = corridor_path(&mut w, Cell::new(1, 0));
        follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Log);
        for _ in 0..4 {
            follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Log);
            assert!(w.actor.position.x <= 1.5);
        }
        assert_eq!(w.actor.position, Vec2::new(1.5, 0.5));
    }

    #[test]
    fn no_path_policies() {
        let mut w = world("..#..", Cell::new(0, 0));

        let mut f = PathFollower::new(Path::EMPTY, Cell::new(4, 0));
        for _ in 0..3 {
            assert_eq!(
                follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Log),
                FollowStatus::NoPath
            );
        }
        assert!(!w.actor.stuck);
        assert_eq!(w.diagnostics().count(Category::Agent, Severity::Warning), 1);

        let mut f = PathFollower::new(Path::EMPTY, Cell::new(4, 0));
        follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::MarkStuck);
        assert!(w.actor.stuck);

        let mut f = PathFollower::new(Path::EMPTY, Cell::new(4, 0));
        follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Teleport);
        assert_eq!(w.actor_cell(), Cell::new(4, 0));
        assert!(!w.actor.stuck);
        assert_eq!(
            follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Teleport),
            FollowStatus::Finished
        );
    }

    #[test]
    fn teleport_without_destination_marks_stuck() {
        let mut w = world("..", Cell::new(0, 0));
        let mut f = PathFollower::none();
        follow_path(&mut w, &mut f, PathEndPolicy::Stop, NoPathPolicy::Teleport);
        assert!(w.actor.stuck);
        assert_eq!(w.actor_cell(), Cell::new(0, 0));
    }
}
