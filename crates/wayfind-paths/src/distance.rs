use wayfind_core::Cell;

/// Manhattan (L1) distance between two cells.
///
/// Saturates at `i32::MAX`, so the [`Cell::NONE`] sentinel is safe to pass.
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> i32 {
    let d = a.x.abs_diff(b.x).saturating_add(a.y.abs_diff(b.y));
    i32::try_from(d).unwrap_or(i32::MAX)
}
