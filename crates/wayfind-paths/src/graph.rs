//! Adjacency-list navigation graph over grid cells.

use std::collections::HashMap;

use wayfind_core::{Category, Cell, Diagnostics, NavConfig, TileGrid};

use crate::neighbors::Neighbors;

/// Navigation graph: each node cell maps to an ordered neighbour list.
///
/// Neighbour order is significant. Searches expand neighbours in stored
/// order, so it decides which of several equally short paths is returned.
#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: HashMap<Cell, Vec<Cell>>,
    /// Node insertion order, for deterministic iteration.
    order: Vec<Cell>,
    max_neighbours: usize,
    diag: Diagnostics,
}

impl Graph {
    /// Create an empty graph whose nodes hold at most `max_neighbours`
    /// neighbours each.
    pub fn new(max_neighbours: usize, diag: Diagnostics) -> Self {
        Self {
            adjacency: HashMap::new(),
            order: Vec::new(),
            max_neighbours,
            diag,
        }
    }

    /// Build a graph from every markable cell of `grid`.
    ///
    /// Each markable cell becomes a node linked to its markable cardinal
    /// neighbours in up, right, down, left order.
    pub fn from_grid<G: TileGrid>(grid: &G, config: &NavConfig, diag: Diagnostics) -> Self {
        let mut graph = Self::new(config.max_neighbours, diag);
        graph.rebuild(grid);
        graph
    }

    /// Clear the graph and rebuild it from `grid`.
    pub fn rebuild<G: TileGrid>(&mut self, grid: &G) {
        self.clear();
        let mut nb = Neighbors::new();
        for cell in grid.cells() {
            if !grid.is_markable(cell) {
                continue;
            }
            let neighbours = nb.cardinal(cell, |n| grid.is_markable(n)).to_vec();
            self.add_node(cell, neighbours);
        }
        self.diag.info(
            Category::Graph,
            format!("built graph with {} nodes from {}", self.len(), grid.bounds()),
        );
    }

    /// Maximum neighbours per node.
    pub fn max_neighbours(&self) -> usize {
        self.max_neighbours
    }

    /// Insert `cell` with the given neighbours.
    ///
    /// Neighbours beyond [`Graph::max_neighbours`] are dropped with a
    /// warning. Re-adding an existing node overwrites its neighbour list.
    pub fn add_node(&mut self, cell: Cell, mut neighbours: Vec<Cell>) {
        if neighbours.len() > self.max_neighbours {
            self.diag.warn(
                Category::Graph,
                format!(
                    "node {cell} given {} neighbours, keeping the first {}",
                    neighbours.len(),
                    self.max_neighbours
                ),
            );
            neighbours.truncate(self.max_neighbours);
        }
        if self.adjacency.insert(cell, neighbours).is_some() {
            self.diag.warn(
                Category::Graph,
                format!("node {cell} re-added, neighbour list overwritten"),
            );
        } else {
            self.order.push(cell);
        }
    }

    /// Remove `cell` and every edge pointing at it.
    ///
    /// Returns `false` if the node was absent.
    pub fn remove_node(&mut self, cell: Cell) -> bool {
        if self.adjacency.remove(&cell).is_none() {
            return false;
        }
        self.order.retain(|&c| c != cell);
        for list in self.adjacency.values_mut() {
            list.retain(|&c| c != cell);
        }
        true
    }

    /// Neighbours of `cell`.
    ///
    /// Returns an empty slice and reports an error if `cell` is not a node.
    pub fn neighbours(&self, cell: Cell) -> &[Cell] {
        match self.adjacency.get(&cell) {
            Some(list) => list.as_slice(),
            None => {
                self.diag.error(
                    Category::Graph,
                    format!("neighbours requested for {cell}, which is not a node"),
                );
                &[]
            }
        }
    }

    /// Append `neighbour` to the list of `cell`.
    ///
    /// Fails (reported, no mutation) if `cell` is not a node or is already at
    /// capacity. Adding an existing neighbour is a successful no-op.
    pub fn add_neighbour(&mut self, cell: Cell, neighbour: Cell) -> bool {
        let max = self.max_neighbours;
        let Some(list) = self.adjacency.get_mut(&cell) else {
            self.diag.error(
                Category::Graph,
                format!("cannot add neighbour {neighbour} to {cell}: not a node"),
            );
            return false;
        };
        if list.contains(&neighbour) {
            return true;
        }
        if list.len() >= max {
            self.diag.error(
                Category::Graph,
                format!("cannot add neighbour {neighbour} to {cell}: already has {max}"),
            );
            return false;
        }
        list.push(neighbour);
        true
    }

    /// Remove `neighbour` from the list of `cell`. Returns whether it was
    /// present.
    pub fn remove_neighbour(&mut self, cell: Cell, neighbour: Cell) -> bool {
        let Some(list) = self.adjacency.get_mut(&cell) else {
            return false;
        };
        let before = list.len();
        list.retain(|&c| c != neighbour);
        list.len() != before
    }

    /// Whether `cell` is a node.
    #[inline]
    pub fn contains_node(&self, cell: Cell) -> bool {
        self.adjacency.contains_key(&cell)
    }

    /// Node cells in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = Cell> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.adjacency.clear();
        self.order.clear();
    }

    /// The diagnostics context this graph reports to.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diag
    }
}
