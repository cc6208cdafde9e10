//! Double-buffered tile compositing core for the Tessera UI toolkit.
//!
//! Drawing operations accumulate in a [`VirtualBuffer`] that records which
//! cells changed since the last flush. A [`Screen`] drains that dirty set (or
//! enumerates the full bound), resolves each coordinate against an ordered
//! [`LayerStack`] via the [`Compositor`], and pushes the result to a
//! [`TileSurface`].
//!
//! - [`geometry`] - grid coordinates and bounds ([`Position`], [`Size`])
//! - [`tile`] - immutable cell values ([`Tile`], [`Color`], [`Modifiers`])
//! - [`store`] - sparse coordinate-to-tile mapping ([`TileStore`])
//! - [`dirty`] - changed-cell tracking with destructive drain ([`DirtyTracker`])
//! - [`buffer`] - the virtual back-buffer ([`VirtualBuffer`])
//! - [`layer`] - offset overlays with per-cell transparency ([`Layer`], [`LayerStack`])
//! - [`compositor`] - topmost-wins tile resolution ([`Compositor`])
//! - [`surface`] - the physical output seam ([`TileSurface`], [`MemorySurface`])
//! - [`registry`] - cross-screen activation ([`ScreenRegistry`])
//! - [`screen`] - the orchestrator ([`Screen`])

pub mod buffer;
pub mod compositor;
pub mod dirty;
mod error;
pub mod geometry;
pub mod icon;
pub mod layer;
pub mod registry;
pub mod screen;
pub mod store;
pub mod surface;
pub mod tile;

pub use buffer::VirtualBuffer;
pub use compositor::Compositor;
pub use dirty::DirtyTracker;
pub use error::ScreenError;
pub use geometry::{Position, Size};
pub use icon::IconCell;
pub use layer::{Layer, LayerStack};
pub use registry::{ScreenEvent, ScreenId, ScreenRegistry};
pub use screen::{LayerSource, Screen};
pub use store::TileStore;
pub use surface::{MemorySurface, TileSurface};
pub use tile::{Color, ColorParseError, Modifiers, Tile};
