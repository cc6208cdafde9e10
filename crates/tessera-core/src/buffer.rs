//! The virtual back-buffer.

use crate::dirty::DirtyTracker;
use crate::error::ScreenError;
use crate::geometry::{Position, Size};
use crate::store::TileStore;
use crate::tile::Tile;
use indexmap::IndexSet;
use parking_lot::RwLock;
use tracing::debug;

/// Tiles and their bound, guarded together so a resize is atomic with
/// respect to concurrent writes.
#[derive(Debug)]
struct Backing {
    tiles: TileStore,
    bound: Size,
}

/// The back-buffer that accumulates drawing operations.
///
/// Every effective write (one that changes the stored tile value) marks its
/// coordinate in the owned [`DirtyTracker`]; writes of an identical tile are
/// suppressed so the dirty set stays minimal. All methods take `&self` —
/// independent producers may write concurrently with a flush draining the
/// tracker.
#[derive(Debug)]
pub struct VirtualBuffer {
    backing: RwLock<Backing>,
    dirty: DirtyTracker,
}

impl VirtualBuffer {
    /// Create a buffer with the given bound.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidResize`] for a degenerate bound.
    pub fn new(bound: Size) -> Result<Self, ScreenError> {
        if bound.is_degenerate() {
            return Err(ScreenError::InvalidResize { size: bound });
        }
        Ok(Self {
            backing: RwLock::new(Backing {
                tiles: TileStore::new(),
                bound,
            }),
            dirty: DirtyTracker::new(),
        })
    }

    /// The current bound.
    #[must_use]
    pub fn size(&self) -> Size {
        self.backing.read().bound
    }

    /// Write a tile, marking the coordinate dirty if the value changed.
    ///
    /// Writing the value already stored is a no-op; this suppresses redundant
    /// dirty entries and keeps flush cost proportional to real changes.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] when the coordinate lies outside
    /// the current bound; nothing is applied.
    pub fn write(&self, position: Position, tile: Tile) -> Result<(), ScreenError> {
        let mut backing = self.backing.write();
        if !backing.bound.contains(position) {
            return Err(ScreenError::OutOfBounds {
                position,
                bound: backing.bound,
            });
        }
        if backing.tiles.get(position) == tile {
            return Ok(());
        }
        backing.tiles.set(position, tile);
        // Marked while the store lock is held: a drain observes the store
        // write and its dirty mark as one step.
        self.dirty.mark(position);
        Ok(())
    }

    /// Read the tile at a coordinate; absent coordinates read as empty.
    ///
    /// Total for any coordinate, in or out of bound.
    #[must_use]
    pub fn read(&self, position: Position) -> Tile {
        self.backing.read().tiles.get(position)
    }

    /// Reset every cell to [`Tile::EMPTY`], marking the removed cells dirty.
    pub fn clear(&self) {
        let mut backing = self.backing.write();
        let touched: Vec<Position> = backing.tiles.positions().collect();
        backing.tiles.clear();
        for position in touched {
            self.dirty.mark(position);
        }
    }

    /// Replace the bound, discarding tiles outside it.
    ///
    /// The dirty tracker is cleared and the entire new bound marked dirty: a
    /// resize deliberately forces a full redraw on the next flush.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidResize`] for a degenerate bound; the
    /// buffer retains its prior state.
    pub fn resize(&self, size: Size) -> Result<(), ScreenError> {
        if size.is_degenerate() {
            return Err(ScreenError::InvalidResize { size });
        }
        let mut backing = self.backing.write();
        debug!(from = %backing.bound, to = %size, "resizing virtual buffer");
        backing.tiles.retain_within(size);
        backing.bound = size;
        self.dirty.clear();
        self.dirty.mark_all(size);
        Ok(())
    }

    /// Atomically take and clear the accumulated dirty set.
    #[must_use]
    pub fn drain_dirty(&self) -> IndexSet<Position> {
        self.dirty.drain()
    }

    /// Number of coordinates currently marked dirty.
    #[must_use]
    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }
}
