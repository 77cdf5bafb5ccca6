//! Routes: paths annotated with the waypoints they must visit.

use std::fmt;

use wayfind_core::Cell;

use crate::path::{Path, PathError, closest_index};

/// A complete path that visits an ordered list of waypoints.
///
/// The waypoints appear in order as a subsequence of the path, and the path
/// ends on the last waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    path: Path,
    waypoints: Vec<Cell>,
    /// Path index at which each waypoint is reached.
    indices: Vec<usize>,
}

impl Route {
    /// Build a route, failing if `path` does not visit `waypoints` in order
    /// and end on the last one.
    pub fn new(path: Path, waypoints: Vec<Cell>) -> Result<Self, RouteError> {
        let indices = match_waypoints(&path, &waypoints)?;
        Ok(Self {
            path,
            waypoints,
            indices,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn waypoints(&self) -> &[Cell] {
        &self.waypoints
    }

    /// Path index at which waypoint `i` is reached.
    pub fn waypoint_path_index(&self, i: usize) -> Option<usize> {
        self.indices.get(i).copied()
    }

    /// The waypoint nearest to `cell`, with its position in the waypoint list.
    pub fn closest_waypoint(&self, cell: Cell) -> Option<(usize, Cell)> {
        closest_index(&self.waypoints, cell).map(|i| (i, self.waypoints[i]))
    }

    /// Index of the path cell nearest to `cell`.
    pub fn closest_path_index(&self, cell: Cell) -> Option<usize> {
        self.path.closest_index_to(cell)
    }
}

/// A route that returns from its last waypoint to its first.
///
/// The path starts and ends on the first waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclicRoute {
    route: Route,
}

impl CyclicRoute {
    /// Build a cyclic route. Validation treats the first waypoint as a
    /// virtual closing waypoint appended after the last.
    pub fn new(path: Path, waypoints: Vec<Cell>) -> Result<Self, RouteError> {
        let Some(&first) = waypoints.first() else {
            return Err(RouteError::NoWaypoints);
        };
        let mut closed = waypoints.clone();
        closed.push(first);
        let mut indices = match_waypoints(&path, &closed)?;
        indices.pop();
        Ok(Self {
            route: Route {
                path,
                waypoints,
                indices,
            },
        })
    }

    /// View as a plain route over the real waypoints.
    pub fn as_route(&self) -> &Route {
        &self.route
    }

    pub fn into_route(self) -> Route {
        self.route
    }

    pub fn path(&self) -> &Path {
        self.route.path()
    }

    pub fn waypoints(&self) -> &[Cell] {
        self.route.waypoints()
    }

    pub fn waypoint_path_index(&self, i: usize) -> Option<usize> {
        self.route.waypoint_path_index(i)
    }

    pub fn closest_waypoint(&self, cell: Cell) -> Option<(usize, Cell)> {
        self.route.closest_waypoint(cell)
    }

    pub fn closest_path_index(&self, cell: Cell) -> Option<usize> {
        self.route.closest_path_index(cell)
    }
}

/// Greedy in-order subsequence match. The last waypoint is pinned to the
/// final path cell.
fn match_waypoints(path: &Path, waypoints: &[Cell]) -> Result<Vec<usize>, RouteError> {
    let Some(&last) = waypoints.last() else {
        return Err(RouteError::NoWaypoints);
    };
    if path.last() != Some(last) {
        return Err(RouteError::WrongEnd {
            expected: last,
            found: path.last(),
        });
    }
    let cells = path.cells();
    let mut indices = Vec::with_capacity(waypoints.len());
    let mut from = 0;
    for (i, &w) in waypoints[..waypoints.len() - 1].iter().enumerate() {
        let Some(offset) = cells[from..].iter().position(|&c| c == w) else {
            return Err(RouteError::WaypointMissing {
                index: i,
                waypoint: w,
            });
        };
        from += offset;
        indices.push(from);
    }
    indices.push(cells.len() - 1);
    Ok(indices)
}

/// Errors raised while building or computing routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A route needs at least one waypoint.
    NoWaypoints,
    /// Waypoint `index` does not appear, in order, on the path.
    WaypointMissing { index: usize, waypoint: Cell },
    /// The path does not end on the last waypoint.
    WrongEnd { expected: Cell, found: Option<Cell> },
    /// No path exists between two consecutive waypoints.
    Unreachable { from: Cell, to: Cell },
    /// Leg paths could not be joined.
    Path(PathError),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWaypoints => f.write_str("route has no waypoints"),
            Self::WaypointMissing { index, waypoint } => {
                write!(f, "waypoint {index} at {waypoint} is not on the route path")
            }
            Self::WrongEnd { expected, found } => match found {
                Some(c) => write!(f, "route path ends at {c}, expected {expected}"),
                None => write!(f, "route path is empty, expected it to end at {expected}"),
            },
            Self::Unreachable { from, to } => write!(f, "no path from {from} to {to}"),
            Self::Path(e) => write!(f, "route path: {e}"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Path(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PathError> for RouteError {
    fn from(e: PathError) -> Self {
        Self::Path(e)
    }
}
