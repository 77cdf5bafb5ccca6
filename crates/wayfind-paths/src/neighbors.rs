use wayfind_core::Cell;

/// Cached neighbour computation helper.
///
/// Enumerates the cardinal (4-way) neighbours of a cell, filtered by a
/// predicate, into a reusable buffer.
pub struct Neighbors {
    buf: Vec<Cell>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4),
        }
    }

    /// Return the cardinal neighbours of `c` (up, right, down, left),
    /// keeping only those for which `keep` returns `true`.
    pub fn cardinal(&mut self, c: Cell, keep: impl Fn(Cell) -> bool) -> &[Cell] {
        self.buf.clear();
        for n in c.neighbors_4() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
