//! The physical output seam: [`TileSurface`] and the in-memory
//! [`MemorySurface`].

use crate::geometry::{Position, Size};
use crate::layer::Layer;
use crate::store::TileStore;
use crate::tile::Tile;
use std::io;
use std::sync::Arc;

/// A physical surface that tiles are flushed to.
///
/// Implementations are synchronous and side-effecting. Writes buffered by an
/// implementation become visible atomically at [`TileSurface::flush`].
///
/// The layer methods are an optimization path for surfaces that can render
/// persistent layers independently of cell content; the default
/// implementation opts out and the compositor folds layers into the cells
/// instead.
pub trait TileSurface {
    /// The surface's current bound.
    fn size(&self) -> Size;

    /// Write one tile. Out-of-bound coordinates may be ignored.
    fn set_tile_at(&mut self, position: Position, tile: Tile) -> io::Result<()>;

    /// Show or hide the cursor.
    fn set_cursor_visibility(&mut self, visible: bool) -> io::Result<()>;

    /// Move the cursor.
    fn put_cursor_at(&mut self, position: Position) -> io::Result<()>;

    /// Commit buffered writes so they become visible.
    fn flush(&mut self) -> io::Result<()>;

    /// Whether the surface renders layers natively.
    fn supports_layers(&self) -> bool {
        false
    }

    /// Drop all layers previously pushed to the surface.
    fn drain_layers(&mut self) {}

    /// Hand a layer to the surface, above all previously pushed ones.
    fn push_layer(&mut self, layer: Arc<Layer>) {
        let _ = layer;
    }
}

/// An in-memory surface recording everything written to it.
///
/// Serves headless rendering and tests: it keeps the last tile written per
/// coordinate, an ordered log of writes since the last counter reset, and
/// flush/cursor state. Optionally injects an I/O failure after a set number
/// of writes.
#[derive(Debug)]
pub struct MemorySurface {
    bound: Size,
    tiles: TileStore,
    write_log: Vec<Position>,
    flushes: usize,
    cursor: Position,
    cursor_visible: bool,
    layers: Vec<Arc<Layer>>,
    layer_support: bool,
    fail_after: Option<usize>,
}

impl MemorySurface {
    /// Create a surface with the given bound.
    #[must_use]
    pub fn new(bound: Size) -> Self {
        Self {
            bound,
            tiles: TileStore::new(),
            write_log: Vec::new(),
            flushes: 0,
            cursor: Position::ORIGIN,
            cursor_visible: true,
            layers: Vec::new(),
            layer_support: false,
            fail_after: None,
        }
    }

    /// Enable the native-layer optimization path.
    #[must_use]
    pub fn with_layer_support(mut self) -> Self {
        self.layer_support = true;
        self
    }

    /// Fail with [`io::ErrorKind::Other`] once this many further writes land.
    pub fn fail_after_writes(&mut self, remaining: usize) {
        self.fail_after = Some(remaining);
    }

    /// The last tile written at a coordinate, empty if never written.
    #[must_use]
    pub fn tile_at(&self, position: Position) -> Tile {
        self.tiles.get(position)
    }

    /// Coordinates written since the last [`Self::reset_counters`], in order.
    #[must_use]
    pub fn write_log(&self) -> &[Position] {
        &self.write_log
    }

    /// Number of writes since the last counter reset.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.write_log.len()
    }

    /// Number of flushes since the last counter reset.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Whether the cursor is visible.
    #[must_use]
    pub const fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// The cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor
    }

    /// Layers currently pushed, bottom-to-top.
    #[must_use]
    pub fn layers(&self) -> &[Arc<Layer>] {
        &self.layers
    }

    /// Change the bound the surface reports. Content is retained.
    pub fn set_bound(&mut self, bound: Size) {
        self.bound = bound;
    }

    /// Clear the write log and flush counter; tile content is retained.
    pub fn reset_counters(&mut self) {
        self.write_log.clear();
        self.flushes = 0;
    }
}

impl TileSurface for MemorySurface {
    fn size(&self) -> Size {
        self.bound
    }

    fn set_tile_at(&mut self, position: Position, tile: Tile) -> io::Result<()> {
        if let Some(remaining) = self.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(io::Error::other("injected surface failure"));
            }
            *remaining -= 1;
        }
        if self.bound.contains(position) {
            self.tiles.set(position, tile);
            self.write_log.push(position);
        }
        Ok(())
    }

    fn set_cursor_visibility(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn put_cursor_at(&mut self, position: Position) -> io::Result<()> {
        self.cursor = position;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn supports_layers(&self) -> bool {
        self.layer_support
    }

    fn drain_layers(&mut self) {
        self.layers.clear();
    }

    fn push_layer(&mut self, layer: Arc<Layer>) {
        self.layers.push(layer);
    }
}
