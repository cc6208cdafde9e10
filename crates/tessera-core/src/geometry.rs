//! Grid geometry: [`Position`], [`Size`], row-major enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A cell coordinate: column (`x`) and row (`y`).
///
/// Positions compare by value and hash; no total ordering is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Column, counted from the left edge.
    pub x: u16,
    /// Row, counted from the top edge.
    pub y: u16,
}

impl Position {
    /// The top-left corner (0, 0).
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Translate this position relative to an origin, if it lies at or past it.
    ///
    /// Returns `None` when `origin` is to the right of or below `self` on
    /// either axis. Used to map absolute coordinates into layer-local space.
    #[must_use]
    pub fn relative_to(self, origin: Self) -> Option<Self> {
        Some(Self {
            x: self.x.checked_sub(origin.x)?,
            y: self.y.checked_sub(origin.y)?,
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A rectangular bound: width (columns) and height (rows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Number of columns.
    pub width: u16,
    /// Number of rows.
    pub height: u16,
}

impl Size {
    /// The empty bound.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total number of cells within the bound.
    #[must_use]
    pub const fn area(self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Whether the bound contains no cells on at least one axis.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether a position falls inside the bound.
    #[must_use]
    pub const fn contains(self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Enumerate every position in the bound in row-major order.
    ///
    /// Row-major order (left-to-right, top-to-bottom) matches the cursor
    /// movement costs of typical physical surfaces, so streaming writers can
    /// consume this directly.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_default_is_origin() {
        assert_eq!(Position::default(), Position::ORIGIN);
    }

    #[test]
    fn test_position_add() {
        assert_eq!(
            Position::new(2, 3) + Position::new(4, 5),
            Position::new(6, 8)
        );
    }

    #[test]
    fn test_position_relative_to() {
        let p = Position::new(5, 7);
        assert_eq!(p.relative_to(Position::new(2, 3)), Some(Position::new(3, 4)));
        assert_eq!(p.relative_to(Position::new(6, 0)), None);
        assert_eq!(p.relative_to(Position::new(0, 8)), None);
        assert_eq!(p.relative_to(p), Some(Position::ORIGIN));
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(4, 9).to_string(), "(4, 9)");
    }

    #[test]
    fn test_size_area() {
        assert_eq!(Size::new(10, 5).area(), 50);
        assert_eq!(Size::ZERO.area(), 0);
    }

    #[test]
    fn test_size_is_degenerate() {
        assert!(Size::ZERO.is_degenerate());
        assert!(Size::new(0, 10).is_degenerate());
        assert!(Size::new(10, 0).is_degenerate());
        assert!(!Size::new(1, 1).is_degenerate());
    }

    #[test]
    fn test_size_contains() {
        let bound = Size::new(10, 5);
        assert!(bound.contains(Position::ORIGIN));
        assert!(bound.contains(Position::new(9, 4)));
        assert!(!bound.contains(Position::new(10, 0)));
        assert!(!bound.contains(Position::new(0, 5)));
    }

    #[test]
    fn test_size_positions_row_major() {
        let positions: Vec<Position> = Size::new(3, 2).positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(2, 1),
            ]
        );
    }

    #[test]
    fn test_size_positions_count_matches_area() {
        let bound = Size::new(7, 11);
        assert_eq!(bound.positions().count() as u32, bound.area());
    }

    #[test]
    fn test_size_positions_empty() {
        assert_eq!(Size::ZERO.positions().count(), 0);
        assert_eq!(Size::new(5, 0).positions().count(), 0);
    }

    #[test]
    fn test_size_display() {
        assert_eq!(Size::new(80, 24).to_string(), "80x24");
    }
}
