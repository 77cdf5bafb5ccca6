//! Validated sequences of adjacent cells.

use std::fmt;

use wayfind_core::{Category, Cell, Diagnostics};

use crate::distance::manhattan;

/// An immutable sequence of cells, each one cardinal step from the last.
///
/// The empty path is the canonical "no path" value returned by searches and
/// failed concatenations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Cell>", into = "Vec<Cell>"))]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// The canonical empty path.
    pub const EMPTY: Path = Path { cells: Vec::new() };

    /// Build a path, failing if any consecutive pair is not adjacent.
    pub fn new(cells: Vec<Cell>) -> Result<Self, PathError> {
        if let Some(index) = first_gap(&cells) {
            return Err(PathError::NotAdjacent {
                index,
                from: cells[index],
                to: cells[index + 1],
            });
        }
        Ok(Self { cells })
    }

    /// A one-cell path.
    pub fn single(cell: Cell) -> Self {
        Self { cells: vec![cell] }
    }

    /// Whether `cells` would form a valid path. Sequences of length 0 and 1
    /// are always valid.
    pub fn is_valid_sequence(cells: &[Cell]) -> bool {
        first_gap(cells).is_none()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Cell> + ExactSizeIterator + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Index of the first occurrence of `cell`.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.cells.iter().position(|&c| c == cell)
    }

    /// The same cells in reverse order.
    pub fn reverse(&self) -> Path {
        let mut cells = self.cells.clone();
        cells.reverse();
        Path { cells }
    }

    /// Total movement cost: the sum of Manhattan step costs.
    pub fn step_cost(&self) -> i32 {
        self.cells.windows(2).map(|w| manhattan(w[0], w[1])).sum()
    }

    /// Index of the path cell nearest to `cell` by squared distance.
    ///
    /// An exact match returns immediately; among equally near cells the
    /// earliest wins. `None` for the empty path.
    pub fn closest_index_to(&self, cell: Cell) -> Option<usize> {
        closest_index(&self.cells, cell)
    }

    /// Concatenate `self` and `other`, sharing the joint cell.
    ///
    /// An empty operand yields the other operand unchanged. Otherwise the last
    /// cell of `self` must equal the first cell of `other`.
    pub fn try_concat(&self, other: &Path) -> Result<Path, PathError> {
        let (Some(end), Some(start)) = (self.last(), other.first()) else {
            return Ok(if self.is_empty() { other.clone() } else { self.clone() });
        };
        if end != start {
            return Err(PathError::NotContiguous {
                left_end: end,
                right_start: start,
            });
        }
        let mut cells = Vec::with_capacity(self.len() + other.len() - 1);
        cells.extend_from_slice(&self.cells);
        cells.extend_from_slice(&other.cells[1..]);
        Ok(Path { cells })
    }

    /// Like [`Path::try_concat`], but a failed join is reported to `diag`
    /// and yields the canonical empty path.
    pub fn concat(&self, other: &Path, diag: &Diagnostics) -> Path {
        match self.try_concat(other) {
            Ok(p) => p,
            Err(e) => {
                diag.error(Category::Route, e.to_string());
                Path::EMPTY
            }
        }
    }
}

/// Nearest-by-squared-distance scan shared by paths and routes.
pub(crate) fn closest_index(cells: &[Cell], target: Cell) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, &c) in cells.iter().enumerate() {
        if c == target {
            return Some(i);
        }
        let d = c.distance_squared(target);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

fn first_gap(cells: &[Cell]) -> Option<usize> {
    cells.windows(2).position(|w| !w[0].is_adjacent(w[1]))
}

impl TryFrom<Vec<Cell>> for Path {
    type Error = PathError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, PathError> {
        Path::new(cells)
    }
}

impl From<Path> for Vec<Cell> {
    fn from(p: Path) -> Self {
        p.cells
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = Cell;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Cell>>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, c) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("]")
    }
}

/// Errors raised by path construction and concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// `cells[index]` and `cells[index + 1]` are not one step apart.
    NotAdjacent { index: usize, from: Cell, to: Cell },
    /// The left path does not end where the right path starts.
    NotContiguous { left_end: Cell, right_start: Cell },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAdjacent { index, from, to } => {
                write!(f, "path cells {from} and {to} at index {index} are not adjacent")
            }
            Self::NotContiguous {
                left_end,
                right_start,
            } => write!(
                f,
                "cannot join paths: left ends at {left_end}, right starts at {right_start}"
            ),
        }
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_core::Severity;

    fn p(cells: &[(i32, i32)]) -> Path {
        Path::new(cells.iter().map(|&c| Cell::from(c)).collect()).unwrap()
    }

    #[test]
    fn short_sequences_are_always_valid() {
        assert!(Path::is_valid_sequence(&[]));
        assert!(Path::is_valid_sequence(&[Cell::new(7, -3)]));
        assert!(Path::new(vec![Cell::new(99, 99)]).is_ok());
    }

    #[test]
    fn non_adjacent_construction_fails() {
        let err = Path::new(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 1)]).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAdjacent {
                index: 1,
                from: Cell::new(1, 0),
                to: Cell::new(2, 1)
            }
        );
        // Diagonal and repeated cells are both gaps.
        assert!(!Path::is_valid_sequence(&[Cell::new(0, 0), Cell::new(1, 1)]));
        assert!(!Path::is_valid_sequence(&[Cell::new(0, 0), Cell::new(0, 0)]));
    }

    #[test]
    fn sentinel_cells_are_rejected_not_overflowed() {
        assert!(Path::new(vec![Cell::NONE, Cell::new(1, 1)]).is_err());
        assert!(!Path::is_valid_sequence(&[Cell::new(1, 1), Cell::NONE]));
        let a = p(&[(100, 100), (101, 100)]);
        assert_eq!(a.closest_index_to(Cell::NONE), Some(0));
    }

    #[test]
    fn reverse_is_an_involution() {
        let a = p(&[(0, 0), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(a.reverse().reverse(), a);
        assert_eq!(a.reverse().first(), Some(Cell::new(1, 2)));
        assert_eq!(Path::EMPTY.reverse(), Path::EMPTY);
    }

    #[test]
    fn concat_shares_the_joint() {
        let a = p(&[(0, 0), (1, 0), (2, 0)]);
        let b = p(&[(2, 0), (2, 1)]);
        let ab = a.try_concat(&b).unwrap();
        assert_eq!(ab.len(), a.len() + b.len() - 1);
        assert_eq!(ab, p(&[(0, 0), (1, 0), (2, 0), (2, 1)]));
    }

    #[test]
    fn concat_single_cell_overlap_collapses() {
        let a = p(&[(3, 3)]);
        let b = p(&[(3, 3)]);
        assert_eq!(a.try_concat(&b).unwrap(), p(&[(3, 3)]));
    }

    #[test]
    fn concat_is_associative() {
        let a = p(&[(0, 0), (1, 0)]);
        let b = p(&[(1, 0), (1, 1), (1, 2)]);
        let c = p(&[(1, 2), (0, 2)]);
        let left = a.try_concat(&b).unwrap().try_concat(&c).unwrap();
        let right = a.try_concat(&b.try_concat(&c).unwrap()).unwrap();
        assert_eq!(left, right);
        assert_eq!(left.len(), 5);
    }

    #[test]
    fn empty_is_the_concat_identity() {
        let a = p(&[(0, 0), (0, 1)]);
        assert_eq!(a.try_concat(&Path::EMPTY).unwrap(), a);
        assert_eq!(Path::EMPTY.try_concat(&a).unwrap(), a);
        assert_eq!(Path::EMPTY.try_concat(&Path::EMPTY).unwrap(), Path::EMPTY);
    }

    #[test]
    fn non_adjacent_concat_reports_once_and_is_empty() {
        let diag = Diagnostics::new();
        let a = p(&[(0, 0), (1, 0)]);
        let b = p(&[(5, 5), (5, 6)]);
        let joined = a.concat(&b, &diag);
        assert_eq!(joined, Path::EMPTY);
        assert_eq!(diag.count_severity(Severity::Error), 1);
        assert_eq!(diag.reports().len(), 1);
    }

    #[test]
    fn closest_index_prefers_exact_then_earliest() {
        let a = p(&[(0, 0), (1, 0), (2, 0), (2, 1)]);
        assert_eq!(a.closest_index_to(Cell::new(2, 0)), Some(2));
        assert_eq!(a.closest_index_to(Cell::new(0, 5)), Some(3));
        assert_eq!(a.closest_index_to(Cell::new(-3, 0)), Some(0));
        // (1,1) is distance 1 from both (1,0) and (2,1); the earlier wins.
        assert_eq!(a.closest_index_to(Cell::new(1, 1)), Some(1));
        assert_eq!(Path::EMPTY.closest_index_to(Cell::ZERO), None);
    }

    #[test]
    fn step_cost_and_queries() {
        let a = p(&[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(a.step_cost(), 2);
        assert!(a.contains(Cell::new(0, 1)));
        assert_eq!(a.index_of(Cell::new(0, 2)), Some(2));
        assert_eq!(a.to_string(), "[(0, 0) (0, 1) (0, 2)]");
        assert_eq!((&a).into_iter().count(), 3);
    }
}
