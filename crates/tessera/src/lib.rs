//! Tessera: a double-buffered tile compositor for terminal UIs.
//!
//! Drawing happens against a virtual back-buffer; [`Screen::display`] takes
//! over the output with a full redraw and [`Screen::refresh`] pushes only the
//! cells that changed since the last flush. Layers composite above the buffer
//! with topmost-wins resolution and per-cell transparency.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tessera::{Position, Screen, ScreenRegistry, TerminalSession, TerminalSurface, Tile};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = TerminalSession::begin()?;
//!     let registry = Arc::new(ScreenRegistry::new());
//!     let screen = Screen::new(TerminalSurface::stdout()?, &registry)?;
//!
//!     screen.write(Position::new(2, 1), Tile::glyph('@'))?;
//!     screen.display()?;
//!
//!     screen.write(Position::new(3, 1), Tile::glyph('@'))?;
//!     screen.refresh()?;
//!
//!     session.end()?;
//!     Ok(())
//! }
//! ```

pub use tessera_core::{
    Color, ColorParseError, Compositor, DirtyTracker, IconCell, Layer, LayerSource, LayerStack,
    MemorySurface, Modifiers, Position, Screen, ScreenError, ScreenEvent, ScreenId,
    ScreenRegistry, Size, Tile, TileStore, TileSurface, VirtualBuffer,
};
pub use tessera_terminal::{TerminalSession, TerminalSurface};
