//! **wayfind-core**: core types for grid navigation.
//!
//! This crate provides the foundational types used across the *wayfind*
//! workspace: grid geometry, the tile-grid collaborator interface, the
//! shared diagnostics context, and navigation configuration.

pub mod config;
pub mod diag;
pub mod geom;
pub mod grid;

pub use config::NavConfig;
pub use diag::{Category, Diagnostics, Report, Severity};
pub use geom::{Cell, Range, RangeIter, Vec2};
pub use grid::{Tile, TileGrid, TileMap, TileMapError};
