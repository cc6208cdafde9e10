//! Offset overlays with per-cell transparency, and their ordered stack.

use crate::error::ScreenError;
use crate::geometry::{Position, Size};
use crate::store::TileStore;
use crate::tile::Tile;
use std::sync::Arc;

/// A rectangular overlay composited above the back-buffer.
///
/// A layer is opaque where its store holds a tile and transparent where it
/// does not; there is no partial-alpha blending. Coordinates inside the layer
/// are relative to its own origin, translated by `offset` at composite time.
///
/// Layers are built mutably, then shared as `Arc<Layer>` once pushed onto a
/// stack; producers may keep their `Arc` and reuse an unchanged layer across
/// flush cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    offset: Position,
    bound: Size,
    tiles: TileStore,
}

impl Layer {
    /// Create a fully transparent layer.
    #[must_use]
    pub fn new(offset: Position, bound: Size) -> Self {
        Self {
            offset,
            bound,
            tiles: TileStore::new(),
        }
    }

    /// Create a layer with every cell set to the same tile.
    #[must_use]
    pub fn filled(offset: Position, bound: Size, tile: Tile) -> Self {
        let mut layer = Self::new(offset, bound);
        for position in bound.positions() {
            layer.tiles.set(position, tile);
        }
        layer
    }

    /// The layer's offset in absolute coordinates.
    #[must_use]
    pub const fn offset(&self) -> Position {
        self.offset
    }

    /// The layer's bound.
    #[must_use]
    pub const fn bound(&self) -> Size {
        self.bound
    }

    /// Set a layer-relative cell, making it opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] when the coordinate lies outside
    /// the layer's bound.
    pub fn set(&mut self, position: Position, tile: Tile) -> Result<(), ScreenError> {
        if !self.bound.contains(position) {
            return Err(ScreenError::OutOfBounds {
                position,
                bound: self.bound,
            });
        }
        self.tiles.set(position, tile);
        Ok(())
    }

    /// Make a layer-relative cell transparent again.
    pub fn clear_at(&mut self, position: Position) {
        self.tiles.remove(position);
    }

    /// Read a layer-relative cell; `None` means transparent.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<Tile> {
        self.tiles.entry(position)
    }

    /// Whether an absolute coordinate falls within the layer's rectangle.
    #[must_use]
    pub fn contains(&self, absolute: Position) -> bool {
        absolute
            .relative_to(self.offset)
            .is_some_and(|relative| self.bound.contains(relative))
    }

    /// Resolve an absolute coordinate against this layer.
    ///
    /// `None` when the coordinate is outside the layer's rectangle or the
    /// cell there is transparent.
    #[must_use]
    pub fn tile_at(&self, absolute: Position) -> Option<Tile> {
        let relative = absolute.relative_to(self.offset)?;
        if !self.bound.contains(relative) {
            return None;
        }
        self.tiles.entry(relative)
    }
}

/// An ordered stack of layers, bottom-to-top.
///
/// Index 0 is drawn first; the last layer is visually on top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Arc<Layer>>,
}

impl LayerStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer on top of the stack.
    pub fn push(&mut self, layer: Arc<Layer>) {
        self.layers.push(layer);
    }

    /// Remove all layers.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Replace the whole stack, preserving the given bottom-to-top order.
    pub fn replace(&mut self, layers: impl IntoIterator<Item = Arc<Layer>>) {
        self.layers.clear();
        self.layers.extend(layers);
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the stack holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate topmost-first, the resolution order for compositing.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Arc<Layer>> {
        self.layers.iter().rev()
    }

    /// Iterate bottom-first, the draw order for surfaces with native layers.
    pub fn iter_bottom_up(&self) -> impl Iterator<Item = &Arc<Layer>> {
        self.layers.iter()
    }
}
