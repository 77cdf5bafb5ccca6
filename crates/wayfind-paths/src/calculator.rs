//! Memoizing facades over a [`PathfindingAlgorithm`].

use std::collections::HashMap;

use wayfind_core::{Category, Cell};

use crate::astar::AStarSearch;
use crate::graph::Graph;
use crate::path::Path;
use crate::route::{CyclicRoute, Route, RouteError};
use crate::traits::PathfindingAlgorithm;

/// Caches paths by ordered `(start, end)` pair.
///
/// Empty results are cached as well, so repeated queries for unreachable
/// pairs do not search again. The cache must be invalidated whenever the
/// graph it was filled from changes.
pub struct PathCalculator {
    algorithm: Box<dyn PathfindingAlgorithm>,
    cache: HashMap<(Cell, Cell), Path>,
    hits: u64,
    misses: u64,
}

impl Default for PathCalculator {
    fn default() -> Self {
        Self::new(Box::new(AStarSearch::new()))
    }
}

impl PathCalculator {
    pub fn new(algorithm: Box<dyn PathfindingAlgorithm>) -> Self {
        Self {
            algorithm,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Path from `start` to `end`, from the cache when possible.
    pub fn path(&mut self, graph: &Graph, start: Cell, end: Cell) -> Path {
        if let Some(p) = self.cache.get(&(start, end)) {
            self.hits += 1;
            return p.clone();
        }
        self.misses += 1;
        let p = self.algorithm.path_between(graph, start, end);
        self.cache.insert((start, end), p.clone());
        p
    }

    /// Whether `(start, end)` has a cached result.
    pub fn is_cached(&self, start: Cell, end: Cell) -> bool {
        self.cache.contains_key(&(start, end))
    }

    /// Forget every cached path.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn algorithm(&self) -> &dyn PathfindingAlgorithm {
        self.algorithm.as_ref()
    }

    pub fn algorithm_mut(&mut self) -> &mut dyn PathfindingAlgorithm {
        self.algorithm.as_mut()
    }
}

/// Builds and caches routes and cyclic routes from waypoint sequences.
///
/// Legs between consecutive waypoints come from an inner
/// [`PathCalculator`]. Routes are cached by the exact waypoint sequence:
/// two different orderings of the same waypoints are two entries.
#[derive(Default)]
pub struct RouteCalculator {
    paths: PathCalculator,
    routes: HashMap<Vec<Cell>, Route>,
    cyclic: HashMap<Vec<Cell>, CyclicRoute>,
}

impl RouteCalculator {
    pub fn new(paths: PathCalculator) -> Self {
        Self {
            paths,
            routes: HashMap::new(),
            cyclic: HashMap::new(),
        }
    }

    /// Route visiting `waypoints` in order.
    pub fn route(&mut self, graph: &Graph, waypoints: &[Cell]) -> Result<Route, RouteError> {
        if let Some(r) = self.routes.get(waypoints) {
            return Ok(r.clone());
        }
        let route = self
            .join_legs(graph, waypoints, false)
            .and_then(|path| Route::new(path, waypoints.to_vec()));
        let route = self.reported(graph, route)?;
        self.routes.insert(waypoints.to_vec(), route.clone());
        Ok(route)
    }

    /// Route visiting `waypoints` in order and returning to the first.
    pub fn cyclic_route(
        &mut self,
        graph: &Graph,
        waypoints: &[Cell],
    ) -> Result<CyclicRoute, RouteError> {
        if let Some(r) = self.cyclic.get(waypoints) {
            return Ok(r.clone());
        }
        let route = self
            .join_legs(graph, waypoints, true)
            .and_then(|path| CyclicRoute::new(path, waypoints.to_vec()));
        let route = self.reported(graph, route)?;
        self.cyclic.insert(waypoints.to_vec(), route.clone());
        Ok(route)
    }

    /// Single leg through the shared path cache.
    pub fn path(&mut self, graph: &Graph, start: Cell, end: Cell) -> Path {
        self.paths.path(graph, start, end)
    }

    pub fn paths(&self) -> &PathCalculator {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut PathCalculator {
        &mut self.paths
    }

    pub fn cached_routes(&self) -> usize {
        self.routes.len() + self.cyclic.len()
    }

    /// Forget every cached path and route.
    pub fn invalidate(&mut self) {
        self.paths.invalidate();
        self.routes.clear();
        self.cyclic.clear();
    }

    fn join_legs(&mut self, graph: &Graph, waypoints: &[Cell], close: bool) -> Result<Path, RouteError> {
        let Some(&first) = waypoints.first() else {
            return Err(RouteError::NoWaypoints);
        };
        let closing = close.then_some(first);
        let stops: Vec<Cell> = waypoints.iter().copied().chain(closing).collect();

        let mut full = Path::single(first);
        for pair in stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                continue;
            }
            let leg = self.paths.path(graph, from, to);
            if leg.is_empty() {
                return Err(RouteError::Unreachable { from, to });
            }
            full = full.try_concat(&leg)?;
        }
        Ok(full)
    }

    fn reported<T>(&self, graph: &Graph, result: Result<T, RouteError>) -> Result<T, RouteError> {
        if let Err(e) = &result {
            graph.diagnostics().error(Category::Route, e.to_string());
        }
        result
    }
}
