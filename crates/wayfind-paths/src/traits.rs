use wayfind_core::Cell;

use crate::graph::Graph;
use crate::path::Path;

/// Lifecycle of a single-pair search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// No search has run yet.
    #[default]
    Idle,
    /// Endpoints validated, per-search state reset.
    Prepared,
    /// Frontier is being expanded.
    Searching,
    /// The goal was reached.
    Found,
    /// The frontier ran dry without reaching the goal.
    Exhausted,
    /// Endpoints were invalid or identical; no search ran.
    Rejected,
}

/// What happened to a cell during a search, for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraceKind {
    /// Popped from the frontier for expansion.
    FrontierPop,
    /// Pushed or re-pushed with an improved cost.
    Relaxed,
    /// Part of the reconstructed path.
    FinalPath,
}

/// Ordered record of every cell a search touched.
///
/// Purely diagnostic: recording can be switched off without changing any
/// search result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchTrace {
    enabled: bool,
    events: Vec<(Cell, TraceKind)>,
}

impl Default for SearchTrace {
    fn default() -> Self {
        Self {
            enabled: true,
            events: Vec::new(),
        }
    }
}

impl SearchTrace {
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.events.clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub(crate) fn record(&mut self, cell: Cell, kind: TraceKind) {
        if self.enabled {
            self.events.push((cell, kind));
        }
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[(Cell, TraceKind)] {
        &self.events
    }

    /// Cells recorded with `kind`, in order.
    pub fn cells_of(&self, kind: TraceKind) -> impl Iterator<Item = Cell> + '_ {
        self.events
            .iter()
            .filter(move |(_, k)| *k == kind)
            .map(|(c, _)| *c)
    }
}

/// Counters for the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Non-stale frontier pops.
    pub popped: usize,
    /// Successful relaxations, the start node included.
    pub relaxed: usize,
    /// Cost of the returned path, if one was found.
    pub cost: Option<i32>,
}

/// A single-pair shortest-path algorithm over a [`Graph`].
pub trait PathfindingAlgorithm {
    /// Shortest path from `start` to `end`, or the empty path.
    ///
    /// Invalid or identical endpoints and unreachable goals all yield the
    /// empty path; the reason is reported to the graph's diagnostics.
    fn path_between(&mut self, graph: &Graph, start: Cell, end: Cell) -> Path;

    /// Phase reached by the most recent search.
    fn phase(&self) -> SearchPhase;

    /// Visit record of the most recent search.
    fn trace(&self) -> &SearchTrace;

    /// Mutable access to the trace, e.g. to switch recording off.
    fn trace_mut(&mut self) -> &mut SearchTrace;

    /// Counters of the most recent search.
    fn stats(&self) -> SearchStats;
}
