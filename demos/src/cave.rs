//! Random-walk cave generation for the demo.

use rand::Rng;
use wayfind_core::{Cell, Tile, TileGrid, TileMap};

/// Carve floor into an all-wall map by random walks from its center until
/// `fill_pct` of the cells are floor.
///
/// Every carved cell is connected to the center, so the result is a single
/// navigable cave. The outer border is never carved.
pub fn random_walk_cave(width: i32, height: i32, fill_pct: f64, rng: &mut impl Rng) -> TileMap {
    let mut map = TileMap::new(width, height, Some(Tile::Wall));
    let inner = |c: Cell| c.x > 0 && c.y > 0 && c.x < width - 1 && c.y < height - 1;
    let total = ((width - 2).max(0) * (height - 2).max(0)) as usize;
    let target = (total as f64 * fill_pct) as usize;
    let start = Cell::new(width / 2, height / 2);
    if !inner(start) {
        return map;
    }

    let mut carved = 0;
    let step_limit = total * 8;
    let mut pos = start;
    for _ in 0..step_limit {
        if carved >= target {
            break;
        }
        if map.at(pos) != Some(Tile::Floor) {
            map.set(pos, Some(Tile::Floor));
            carved += 1;
        }
        let next = pos.neighbors_4()[rng.random_range(0..4usize)];
        if inner(next) {
            pos = next;
        }
    }
    map
}

/// Every floor cell of `map`, row-major.
pub fn floor_cells(map: &TileMap) -> Vec<Cell> {
    map.cells().filter(|&c| map.is_markable(c)).collect()
}
