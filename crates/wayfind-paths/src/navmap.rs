//! The navigation map: a tile grid, its graph, and the searches over them.

use wayfind_core::{Cell, Diagnostics, NavConfig, TileGrid, Vec2};

use crate::calculator::RouteCalculator;
use crate::graph::Graph;
use crate::nearest::NearestNodeFinder;
use crate::path::Path;
use crate::route::{CyclicRoute, Route, RouteError};
use crate::traits::SearchTrace;

/// Owns a [`TileGrid`], the [`Graph`] built from it, and the cached
/// path/route calculators and nearest-node finder that query it.
///
/// Every mutation of the grid or graph goes through this type so the
/// caches can be invalidated.
pub struct NavigationMap<G: TileGrid> {
    grid: G,
    graph: Graph,
    routes: RouteCalculator,
    nearest: NearestNodeFinder,
    config: NavConfig,
    diag: Diagnostics,
}

impl<G: TileGrid> NavigationMap<G> {
    /// Build the graph from `grid` and set up empty caches.
    pub fn new(grid: G, config: NavConfig, diag: Diagnostics) -> Self {
        let graph = Graph::from_grid(&grid, &config, diag.clone());
        Self {
            grid,
            graph,
            routes: RouteCalculator::default(),
            nearest: NearestNodeFinder::new(config.bfs_visit_cap, diag.clone()),
            config,
            diag,
        }
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }

    /// Edit the grid, then rebuild the graph and drop every cached result.
    pub fn edit_grid(&mut self, edit: impl FnOnce(&mut G)) {
        edit(&mut self.grid);
        self.graph.rebuild(&self.grid);
        self.routes.invalidate();
    }

    /// Edit the graph directly, then drop every cached result.
    pub fn edit_graph(&mut self, edit: impl FnOnce(&mut Graph)) {
        edit(&mut self.graph);
        self.routes.invalidate();
    }

    /// Shortest path between two nodes (cached).
    pub fn path(&mut self, start: Cell, end: Cell) -> Path {
        self.routes.path(&self.graph, start, end)
    }

    /// Route through `waypoints` in order (cached).
    pub fn route(&mut self, waypoints: &[Cell]) -> Result<Route, RouteError> {
        self.routes.route(&self.graph, waypoints)
    }

    /// Closed route through `waypoints` back to the first (cached).
    pub fn cyclic_route(&mut self, waypoints: &[Cell]) -> Result<CyclicRoute, RouteError> {
        self.routes.cyclic_route(&self.graph, waypoints)
    }

    /// Nearest node to `cell`, or [`Cell::NONE`].
    pub fn closest_node_to_cell(&self, cell: Cell) -> Cell {
        self.nearest.closest_node_to_cell(&self.grid, &self.graph, cell)
    }

    /// Nearest node to a world position, or [`Cell::NONE`].
    pub fn closest_node_to_position(&self, pos: Vec2) -> Cell {
        self.closest_node_to_cell(self.grid.world_to_cell(pos))
    }

    pub fn nearest_finder(&self) -> &NearestNodeFinder {
        &self.nearest
    }

    /// World-space center of `cell`.
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        self.grid.cell_to_world_center(cell)
    }

    /// Grid cell containing `pos`.
    pub fn cell_at(&self, pos: Vec2) -> Cell {
        self.grid.world_to_cell(pos)
    }

    /// Visit record of the most recent search that actually ran.
    pub fn last_trace(&self) -> &SearchTrace {
        self.routes.paths().algorithm().trace()
    }

    /// Path and route cache.
    pub fn calculator(&self) -> &RouteCalculator {
        &self.routes
    }
}
