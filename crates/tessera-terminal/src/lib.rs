//! Crossterm backend for the tessera tile compositor.
//!
//! [`TerminalSurface`] implements `tessera_core::TileSurface` on top of any
//! `std::io::Write`, batching escape sequences and skipping redundant cursor
//! and style output. [`TerminalSession`] is the raw-mode guard that claims
//! and restores the terminal around it.

pub mod session;
pub mod surface;

pub use session::TerminalSession;
pub use surface::TerminalSurface;
