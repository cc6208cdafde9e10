//! Error types for the compositing core.

use crate::geometry::{Position, Size};
use thiserror::Error;

/// Errors surfaced by buffer, layer, and screen operations.
///
/// Nothing here is fatal to the process; every failure is scoped to one
/// screen or one flush.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// A write targeted a coordinate outside the current bound.
    /// Rejected with no partial effect.
    #[error("write at {position} is outside the {bound} bound")]
    OutOfBounds {
        /// The rejected coordinate.
        position: Position,
        /// The bound in effect at the time of the write.
        bound: Size,
    },

    /// A resize requested a degenerate bound. The prior state is retained.
    #[error("invalid resize to {size}: bound must be non-degenerate")]
    InvalidResize {
        /// The rejected bound.
        size: Size,
    },

    /// The physical surface reported a write or flush failure.
    ///
    /// The flush that observed this aborts; the next successful flush runs as
    /// a full redraw since the surface can no longer be assumed in sync.
    #[error("surface write failed: {0}")]
    Surface(#[from] std::io::Error),
}
