//! Sparse coordinate-to-tile mapping.

use crate::geometry::{Position, Size};
use crate::tile::Tile;
use std::collections::HashMap;

/// A sparse mapping from [`Position`] to [`Tile`].
///
/// Only explicitly written coordinates are present; absent coordinates read
/// as [`Tile::EMPTY`]. Presence doubles as the per-cell opacity flag when a
/// store backs a layer, so [`TileStore::entry`] distinguishes "written empty
/// tile" from "never written".
///
/// Bounded row-major enumeration lives on [`Size::positions`]; the store
/// itself is unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileStore {
    tiles: HashMap<Position, Tile>,
}

impl TileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tile, overwriting any previous value.
    pub fn set(&mut self, position: Position, tile: Tile) {
        self.tiles.insert(position, tile);
    }

    /// Read the tile at a position, defaulting to [`Tile::EMPTY`] if absent.
    #[must_use]
    pub fn get(&self, position: Position) -> Tile {
        self.tiles.get(&position).copied().unwrap_or_default()
    }

    /// Read the tile at a position, `None` if never written.
    #[must_use]
    pub fn entry(&self, position: Position) -> Option<Tile> {
        self.tiles.get(&position).copied()
    }

    /// Remove the tile at a position, returning it if present.
    pub fn remove(&mut self, position: Position) -> Option<Tile> {
        self.tiles.remove(&position)
    }

    /// Remove every tile.
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Discard every tile outside the given bound.
    pub fn retain_within(&mut self, bound: Size) {
        self.tiles.retain(|position, _| bound.contains(*position));
    }

    /// Number of explicitly written coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no coordinate has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate over written coordinates in arbitrary order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.tiles.keys().copied()
    }
}
