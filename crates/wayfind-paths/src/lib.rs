//! Navigation graphs and pathfinding for grid worlds.
//!
//! This crate builds a navigation [`Graph`] from a [`TileGrid`] and answers
//! routing queries over it:
//!
//! - **A\*** shortest paths between two nodes ([`AStarSearch`])
//! - validated [`Path`]s, [`Route`]s through ordered waypoints and closed
//!   [`CyclicRoute`]s
//! - memoized queries ([`PathCalculator`], [`RouteCalculator`])
//! - bounded breadth-first nearest-node lookup ([`NearestNodeFinder`])
//!
//! [`NavigationMap`] ties a grid, its graph and the caches together and is
//! the usual entry point.
//!
//! Expected failures (no path, identical endpoints, nothing near enough) are
//! reported to the shared [`Diagnostics`](wayfind_core::Diagnostics) context
//! and return the empty path or [`Cell::NONE`](wayfind_core::Cell::NONE).
//! Only path and route construction return errors.
//!
//! [`TileGrid`]: wayfind_core::TileGrid

mod astar;
mod calculator;
mod distance;
mod graph;
mod navmap;
mod nearest;
mod neighbors;
mod path;
mod route;
mod traits;

pub use astar::AStarSearch;
pub use calculator::{PathCalculator, RouteCalculator};
pub use distance::manhattan;
pub use graph::Graph;
pub use navmap::NavigationMap;
pub use nearest::{NearestNodeFinder, SearchState};
pub use neighbors::Neighbors;
pub use path::{Path, PathError};
pub use route::{CyclicRoute, Route, RouteError};
pub use traits::{PathfindingAlgorithm, SearchPhase, SearchStats, SearchTrace, TraceKind};
