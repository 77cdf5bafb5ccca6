use std::collections::{BinaryHeap, HashMap};

use wayfind_core::{Category, Cell};

use crate::distance::manhattan;
use crate::graph::Graph;
use crate::path::Path;
use crate::traits::{PathfindingAlgorithm, SearchPhase, SearchStats, SearchTrace, TraceKind};

/// Frontier entry, ordered so `BinaryHeap` (a max-heap) pops the smallest
/// `f` first and, among equal `f`, the earliest pushed.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct NodeRef {
    cell: Cell,
    g: i32,
    f: i32,
    seq: u64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search over a [`Graph`] with Manhattan step costs and heuristic.
///
/// The heuristic is admissible and consistent on a 4-connected grid, so
/// returned paths are optimal. Ties between equal-priority frontier entries
/// are broken first-in first-out, which makes results deterministic for a
/// given graph.
///
/// All per-search buffers are owned by the searcher and reused across calls.
#[derive(Debug, Default)]
pub struct AStarSearch {
    open: BinaryHeap<NodeRef>,
    costs: HashMap<Cell, i32>,
    came_from: HashMap<Cell, Cell>,
    seq: u64,
    phase: SearchPhase,
    trace: SearchTrace,
    stats: SearchStats,
}

impl AStarSearch {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.open.clear();
        self.costs.clear();
        self.came_from.clear();
        self.seq = 0;
        self.trace.clear();
        self.stats = SearchStats::default();
        self.phase = SearchPhase::Idle;
    }

    fn push(&mut self, cell: Cell, g: i32, goal: Cell) {
        let seq = self.seq;
        self.seq += 1;
        self.open.push(NodeRef {
            cell,
            g,
            f: g + manhattan(cell, goal),
            seq,
        });
    }

    /// Walk predecessors back from `goal` and reverse.
    fn reconstruct(&mut self, start: Cell, goal: Cell) -> Vec<Cell> {
        let mut cells = vec![goal];
        let mut cur = goal;
        while cur != start {
            match self.came_from.get(&cur) {
                Some(&prev) => {
                    cells.push(prev);
                    cur = prev;
                }
                None => break,
            }
        }
        cells.reverse();
        for &c in &cells {
            self.trace.record(c, TraceKind::FinalPath);
        }
        cells
    }
}

impl PathfindingAlgorithm for AStarSearch {
    fn path_between(&mut self, graph: &Graph, start: Cell, end: Cell) -> Path {
        self.reset();
        let diag = graph.diagnostics();

        let missing: Vec<Cell> = [start, end]
            .into_iter()
            .filter(|&c| !graph.contains_node(c))
            .collect();
        if !missing.is_empty() {
            self.phase = SearchPhase::Rejected;
            let list: Vec<String> = missing.iter().map(Cell::to_string).collect();
            diag.error(
                Category::Search,
                format!(
                    "cannot search {start} -> {end}: {} not in the graph",
                    list.join(", ")
                ),
            );
            return Path::EMPTY;
        }
        if start == end {
            self.phase = SearchPhase::Rejected;
            diag.warn(
                Category::Search,
                format!("search requested from {start} to itself"),
            );
            return Path::EMPTY;
        }

        self.phase = SearchPhase::Prepared;
        self.costs.insert(start, 0);
        self.stats.relaxed += 1;
        self.trace.record(start, TraceKind::Relaxed);
        self.push(start, 0, end);
        self.phase = SearchPhase::Searching;

        let found = loop {
            let Some(current) = self.open.pop() else {
                break false;
            };
            // Skip entries superseded by a cheaper relaxation.
            if self.costs.get(&current.cell).is_some_and(|&g| current.g > g) {
                continue;
            }
            self.stats.popped += 1;
            self.trace.record(current.cell, TraceKind::FrontierPop);
            if current.cell == end {
                break true;
            }

            for &next in graph.neighbours(current.cell) {
                if !graph.contains_node(next) {
                    continue;
                }
                let tentative = current.g + manhattan(current.cell, next);
                if self.costs.get(&next).is_some_and(|&g| tentative >= g) {
                    continue;
                }
                self.costs.insert(next, tentative);
                self.came_from.insert(next, current.cell);
                self.stats.relaxed += 1;
                self.trace.record(next, TraceKind::Relaxed);
                self.push(next, tentative, end);
            }
        };

        if !found {
            self.phase = SearchPhase::Exhausted;
            diag.info(Category::Search, format!("no path found from {start} to {end}"));
            return Path::EMPTY;
        }

        self.phase = SearchPhase::Found;
        self.stats.cost = self.costs.get(&end).copied();
        let cells = self.reconstruct(start, end);
        match Path::new(cells) {
            Ok(p) => p,
            Err(e) => {
                // Only reachable if the graph links non-adjacent cells.
                diag.error(Category::Search, format!("search produced an invalid path: {e}"));
                Path::EMPTY
            }
        }
    }

    fn phase(&self) -> SearchPhase {
        self.phase
    }

    fn trace(&self) -> &SearchTrace {
        &self.trace
    }

    fn trace_mut(&mut self) -> &mut SearchTrace {
        &mut self.trace
    }

    fn stats(&self) -> SearchStats {
        self.stats
    }
}
