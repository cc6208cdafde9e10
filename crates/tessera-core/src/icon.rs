//! Single-cell status icons that write through to the back-buffer.

use crate::buffer::VirtualBuffer;
use crate::error::ScreenError;
use crate::geometry::Position;
use crate::tile::Tile;
use tracing::trace;

/// A one-cell indicator pinned at a fixed coordinate.
///
/// Setters are change-driven: updating to the value already shown does
/// nothing, so an icon can be re-set every frame without ever dirtying its
/// cell. On an actual change the new tile is written through immediately and
/// becomes visible at the next refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct IconCell {
    position: Position,
    tile: Tile,
}

impl IconCell {
    /// Pin an icon at a coordinate with its initial tile.
    #[must_use]
    pub const fn new(position: Position, tile: Tile) -> Self {
        Self { position, tile }
    }

    /// The pinned coordinate.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// The current tile.
    #[must_use]
    pub const fn tile(&self) -> Tile {
        self.tile
    }

    /// Write the current tile into the buffer unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] when the pinned coordinate lies
    /// outside the buffer's bound.
    pub fn draw(&self, buffer: &VirtualBuffer) -> Result<(), ScreenError> {
        buffer.write(self.position, self.tile)
    }

    /// Replace the tile, writing through on change.
    ///
    /// Returns `true` when the tile actually changed.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] when the pinned coordinate lies
    /// outside the buffer's bound; the held tile is left unchanged.
    pub fn set_tile(&mut self, buffer: &VirtualBuffer, tile: Tile) -> Result<bool, ScreenError> {
        if tile == self.tile {
            return Ok(false);
        }
        buffer.write(self.position, tile)?;
        self.tile = tile;
        trace!(position = %self.position, glyph = %tile.glyph, "icon updated");
        Ok(true)
    }

    /// Replace only the glyph, keeping colors and modifiers.
    ///
    /// # Errors
    ///
    /// Same as [`IconCell::set_tile`].
    pub fn set_glyph(&mut self, buffer: &VirtualBuffer, glyph: char) -> Result<bool, ScreenError> {
        self.set_tile(buffer, Tile { glyph, ..self.tile })
    }
}
