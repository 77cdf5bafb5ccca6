use std::cell;
use std::collections::{HashSet, VecDeque};

use wayfind_core::{Category, Cell, Diagnostics, TileGrid};

use crate::graph::Graph;
use crate::neighbors::Neighbors;

/// Whether a nearest-node search is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    InProgress,
}

/// Bounded breadth-first search for the graph node nearest to an arbitrary
/// cell.
///
/// Expansion walks the *grid* (every cell the grid has, walkable or not),
/// not the graph, so it can start from walls or other non-node cells.
/// Only one search may run at a time per finder: a call made while another
/// is in progress, for instance from inside a visit observer, is rejected
/// and returns [`Cell::NONE`].
#[derive(Debug)]
pub struct NearestNodeFinder {
    state: cell::Cell<SearchState>,
    visit_cap: usize,
    diag: Diagnostics,
}

/// Resets the finder to idle when the search scope ends, unwinding included.
struct InProgress<'a>(&'a cell::Cell<SearchState>);

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.set(SearchState::Idle);
    }
}

impl NearestNodeFinder {
    pub fn new(visit_cap: usize, diag: Diagnostics) -> Self {
        Self {
            state: cell::Cell::new(SearchState::Idle),
            visit_cap,
            diag,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    pub fn visit_cap(&self) -> usize {
        self.visit_cap
    }

    pub fn set_visit_cap(&mut self, cap: usize) {
        self.visit_cap = cap;
    }

    /// Nearest graph node to `start`, or [`Cell::NONE`].
    pub fn closest_node_to_cell<G: TileGrid>(&self, grid: &G, graph: &Graph, start: Cell) -> Cell {
        self.closest_node_with(grid, graph, start, |_| {})
    }

    /// Like [`NearestNodeFinder::closest_node_to_cell`], calling `on_visit`
    /// for each visited cell in visit order.
    pub fn closest_node_with<G: TileGrid>(
        &self,
        grid: &G,
        graph: &Graph,
        start: Cell,
        mut on_visit: impl FnMut(Cell),
    ) -> Cell {
        if self.state.get() == SearchState::InProgress {
            self.diag.error(
                Category::Nearest,
                format!("nearest-node search from {start} rejected: a search is already running"),
            );
            return Cell::NONE;
        }
        self.state.set(SearchState::InProgress);
        let _guard = InProgress(&self.state);

        let mut queue = VecDeque::from([start]);
        let mut seen = HashSet::from([start]);
        let mut nb = Neighbors::new();
        let mut visited = 0;

        while let Some(c) = queue.pop_front() {
            if visited == self.visit_cap {
                self.diag.warn(
                    Category::Nearest,
                    format!(
                        "no graph node within {} visited cells of {start}",
                        self.visit_cap
                    ),
                );
                return Cell::NONE;
            }
            visited += 1;
            on_visit(c);
            if graph.contains_node(c) {
                return c;
            }
            for &n in nb.cardinal(c, |n| grid.has_cell(n)) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }

        self.diag.warn(
            Category::Nearest,
            format!("no graph node reachable over the grid from {start}"),
        );
        Cell::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::{NavConfig, Severity, TileMap};

    // A corridor of walls leading to a single floor cell three steps away.
    const CORRIDOR: &str = "####.";

    fn setup(cap: usize) -> (TileMap, Graph, NearestNodeFinder, Diagnostics) {
        let diag = Diagnostics::new();
        let map = TileMap::parse(CORRIDOR).unwrap();
        let graph = Graph::from_grid(&map, &NavConfig::default(), diag.clone());
        diag.clear();
        (map, graph, NearestNodeFinder::new(cap, diag.clone()), diag)
    }

    #[test]
    fn finds_node_three_steps_away() {
        let (map, graph, finder, diag) = setup(20);
        let found = finder.closest_node_to_cell(&map, &graph, Cell::new(1, 0));
        assert_eq!(found, Cell::new(4, 0));
        assert!(diag.reports().is_empty());
        assert_eq!(finder.state(), SearchState::Idle);
    }

    #[test]
    fn visit_cap_too_small_returns_sentinel() {
        let (map, graph, finder, diag) = setup(2);
        let found = finder.closest_node_to_cell(&map, &graph, Cell::new(1, 0));
        assert!(found.is_none());
        assert_eq!(diag.count(Category::Nearest, Severity::Warning), 1);
        assert_eq!(finder.state(), SearchState::Idle);
    }

    #[test]
    fn start_on_a_node_returns_it() {
        let (map, graph, finder, _) = setup(1);
        assert_eq!(
            finder.closest_node_to_cell(&map, &graph, Cell::new(4, 0)),
            Cell::new(4, 0)
        );
    }

    #[test]
    fn visit_order_is_breadth_first() {
        let diag = Diagnostics::new();
        let map = TileMap::parse(
            "\
###
###
..#",
        )
        .unwrap();
        let graph = Graph::from_grid(&map, &NavConfig::default(), diag.clone());
        let finder = NearestNodeFinder::new(20, diag);
        let mut visits = Vec::new();
        let found = finder.closest_node_with(&map, &graph, Cell::new(1, 1), |c| visits.push(c));
        // Up, right, down: down is the floor cell (1, 2).
        assert_eq!(found, Cell::new(1, 2));
        assert_eq!(
            visits,
            vec![
                Cell::new(1, 1),
                Cell::new(1, 0),
                Cell::new(2, 1),
                Cell::new(1, 2)
            ]
        );
    }

    #[test]
    fn enclosed_start_without_nodes_fails() {
        let diag = Diagnostics::new();
        let map = TileMap::parse("## ..").unwrap();
        let graph = Graph::from_grid(&map, &NavConfig::default(), diag.clone());
        diag.clear();
        let finder = NearestNodeFinder::new(20, diag.clone());
        assert!(finder.closest_node_to_cell(&map, &graph, Cell::new(0, 0)).is_none());
        assert_eq!(diag.count(Category::Nearest, Severity::Warning), 1);
    }

    #[test]
    fn reentrant_search_is_rejected() {
        let (map, graph, finder, diag) = setup(20);
        let mut inner = None;
        let outer = finder.closest_node_with(&map, &graph, Cell::new(0, 0), |_| {
            if inner.is_none() {
                inner = Some(finder.closest_node_to_cell(&map, &graph, Cell::new(1, 0)));
            }
        });
        assert_eq!(outer, Cell::new(4, 0));
        assert_eq!(inner, Some(Cell::NONE));
        assert_eq!(diag.count(Category::Nearest, Severity::Error), 1);
        // The guard is released once the outer search returns.
        assert_eq!(
            finder.closest_node_to_cell(&map, &graph, Cell::new(1, 0)),
            Cell::new(4, 0)
        );
    }
}
