//! Tile grids: the [`TileGrid`] collaborator trait and the in-memory
//! [`TileMap`] that implements it.
//!
//! The navigation layer never inspects tiles directly. It asks a
//! [`TileGrid`] whether a cell exists, whether it is markable (walkable and
//! therefore a graph node), and how cells map to world positions.

use std::fmt;

use crate::geom::{Cell, Range, RangeIter, Vec2};

/// The grid interface the navigation core needs from its host.
pub trait TileGrid {
    /// Bounding range of every cell the grid can hold.
    fn bounds(&self) -> Range;

    /// Whether a tile exists at `cell`.
    fn has_cell(&self, cell: Cell) -> bool;

    /// Whether `cell` can be walked on and should become a graph node.
    fn is_markable(&self, cell: Cell) -> bool;

    /// World-space center of `cell`.
    fn cell_to_world_center(&self, cell: Cell) -> Vec2;

    /// The cell containing world position `pos`.
    fn world_to_cell(&self, pos: Vec2) -> Cell;

    /// Row-major enumeration of every cell in bounds.
    fn cells(&self) -> RangeIter {
        self.bounds().iter()
    }
}

/// A tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tile {
    Floor,
    Wall,
}

impl Tile {
    /// Whether actors may stand on this tile.
    pub const fn walkable(self) -> bool {
        matches!(self, Tile::Floor)
    }
}

/// Rectangular map of optional tiles.
///
/// Cells with no tile are holes: they are outside the map for every
/// purpose except bounds iteration.
#[derive(Debug, Clone)]
pub struct TileMap {
    tiles: Vec<Option<Tile>>,
    width: i32,
    height: i32,
    tile_size: f32,
    origin: Vec2,
}

impl TileMap {
    /// Create a `width × height` map filled with `fill`, with unit tiles at
    /// the world origin.
    pub fn new(width: i32, height: i32, fill: Option<Tile>) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            tiles: vec![fill; (width * height) as usize],
            width,
            height,
            tile_size: 1.0,
            origin: Vec2::ZERO,
        }
    }

    /// Parse an ASCII layout: `.` floor, `#` wall, space for no tile.
    ///
    /// Every line must have the same width.
    pub fn parse(layout: &str) -> Result<Self, TileMapError> {
        let lines: Vec<&str> = layout.lines().collect();
        let width = lines.first().map_or(0, |l| l.chars().count());
        if lines.iter().any(|l| l.chars().count() != width) {
            return Err(TileMapError::InconsistentSize(layout.to_string()));
        }
        let mut map = Self::new(width as i32, lines.len() as i32, None);
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '.' => Some(Tile::Floor),
                    '#' => Some(Tile::Wall),
                    ' ' => None,
                    _ => {
                        return Err(TileMapError::InvalidRune {
                            ch,
                            cell: Cell::new(x as i32, y as i32),
                        });
                    }
                };
                map.set(Cell::new(x as i32, y as i32), tile);
            }
        }
        Ok(map)
    }

    /// Set the world-space size of one tile edge.
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the world position of the top-left corner of cell (0, 0).
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn index(&self, c: Cell) -> Option<usize> {
        if !self.bounds().contains(c) {
            return None;
        }
        Some((c.y * self.width + c.x) as usize)
    }

    /// Tile at `c`, or `None` if out of bounds or a hole.
    pub fn at(&self, c: Cell) -> Option<Tile> {
        self.index(c).and_then(|i| self.tiles[i])
    }

    /// Set the tile at `c`. Does nothing if out of bounds.
    pub fn set(&mut self, c: Cell, tile: Option<Tile>) {
        if let Some(i) = self.index(c) {
            self.tiles[i] = tile;
        }
    }

    /// Count cells holding `tile`.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == Some(tile)).count()
    }

    /// Render back to the ASCII layout accepted by [`TileMap::parse`].
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(match self.at(Cell::new(x, y)) {
                    Some(Tile::Floor) => '.',
                    Some(Tile::Wall) => '#',
                    None => ' ',
                });
            }
            if y < self.height - 1 {
                out.push('\n');
            }
        }
        out
    }
}

impl TileGrid for TileMap {
    fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    fn has_cell(&self, cell: Cell) -> bool {
        self.at(cell).is_some()
    }

    fn is_markable(&self, cell: Cell) -> bool {
        self.at(cell).is_some_and(Tile::walkable)
    }

    fn cell_to_world_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.tile_size,
            self.origin.y + (cell.y as f32 + 0.5) * self.tile_size,
        )
    }

    fn world_to_cell(&self, pos: Vec2) -> Cell {
        let rel = pos - self.origin;
        Cell::new(
            (rel.x / self.tile_size).floor() as i32,
            (rel.y / self.tile_size).floor() as i32,
        )
    }
}

/// Errors that can occur when parsing a tile layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileMapError {
    /// Lines have inconsistent widths.
    InconsistentSize(String),
    /// A character other than `.`, `#` or space was found.
    InvalidRune { ch: char, cell: Cell },
}

impl fmt::Display for TileMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize(s) => write!(f, "tile map: inconsistent line widths:\n{s}"),
            Self::InvalidRune { ch, cell } => {
                write!(f, "tile map contains invalid rune \u{201c}{ch}\u{201d} at {cell}")
            }
        }
    }
}

impl std::error::Error for TileMapError {}
