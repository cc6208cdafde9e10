//! Topmost-wins tile resolution.

use crate::buffer::VirtualBuffer;
use crate::geometry::Position;
use crate::layer::LayerStack;
use crate::tile::Tile;

/// Resolves the final visible tile for a coordinate.
///
/// Walks the layer stack top-down and returns the first opaque cell covering
/// the coordinate, falling back to the virtual buffer. Resolution is a pure
/// function of the borrowed state: it mutates nothing (in particular, it
/// never touches the dirty tracker) and may be invoked any number of times
/// per coordinate per flush.
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'a> {
    layers: &'a LayerStack,
    buffer: &'a VirtualBuffer,
}

impl<'a> Compositor<'a> {
    /// Borrow a layer stack and buffer for resolution.
    #[must_use]
    pub const fn new(layers: &'a LayerStack, buffer: &'a VirtualBuffer) -> Self {
        Self { layers, buffer }
    }

    /// The final visible tile at a coordinate. First opaque match wins.
    #[must_use]
    pub fn resolve(&self, position: Position) -> Tile {
        for layer in self.layers.iter_top_down() {
            if let Some(tile) = layer.tile_at(position) {
                return tile;
            }
        }
        self.buffer.read(position)
    }
}
