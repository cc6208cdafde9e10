//! Immutable cell values: [`Tile`], [`Color`], [`Modifiers`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGBA color with 8-bit channels.
///
/// An alpha of zero means "terminal default" when a surface maps the color to
/// concrete output; the compositing core itself never blends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (0 = use the surface default).
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent; surfaces substitute their default.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Whether the color defers to the surface default.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Parse a hex color string (e.g. `"#ff0000"` or `"ff000080"`).
    ///
    /// Supports 6-character RGB and 8-character RGBA forms.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(hex.get(range).unwrap_or_default(), 16)
                .map_err(|_| ColorParseError::InvalidHex)
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ColorParseError::InvalidLength),
        }
    }

    /// Format as a hex string, including alpha only when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Error type for color parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Invalid hex characters.
    #[error("invalid hex characters")]
    InvalidHex,
    /// Invalid string length.
    #[error("invalid hex string length (expected 6 or 8)")]
    InvalidLength,
}

/// Text modifiers for a tile, stored as a bitset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self(0);
    /// Bold text.
    pub const BOLD: Self = Self(1 << 0);
    /// Italic text.
    pub const ITALIC: Self = Self(1 << 1);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Strikethrough text.
    pub const STRIKETHROUGH: Self = Self(1 << 3);
    /// Dim/faint text.
    pub const DIM: Self = Self(1 << 4);
    /// Blinking text.
    pub const BLINK: Self = Self(1 << 5);
    /// Reversed colors.
    pub const REVERSE: Self = Self(1 << 6);
    /// Hidden text.
    pub const HIDDEN: Self = Self(1 << 7);

    /// Check if no modifier is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Check if every modifier in `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Add a modifier.
    #[must_use]
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Remove a modifier.
    #[must_use]
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for Modifiers {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// One cell's visible content: a glyph plus style attributes.
///
/// Tiles are immutable values compared by equality; redrawing decisions all
/// reduce to `==` on tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// The glyph displayed in the cell.
    pub glyph: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Tile {
    /// The empty tile: a space with default styling.
    ///
    /// Coordinates never written hold this value implicitly.
    pub const EMPTY: Self = Self {
        glyph: ' ',
        fg: Color::WHITE,
        bg: Color::TRANSPARENT,
        modifiers: Modifiers::NONE,
    };

    /// Create a fully specified tile.
    #[must_use]
    pub const fn new(glyph: char, fg: Color, bg: Color, modifiers: Modifiers) -> Self {
        Self {
            glyph,
            fg,
            bg,
            modifiers,
        }
    }

    /// Create a tile with the given glyph and default styling.
    #[must_use]
    pub const fn glyph(glyph: char) -> Self {
        Self {
            glyph,
            ..Self::EMPTY
        }
    }

    /// Return a copy with a different foreground color.
    #[must_use]
    pub const fn with_fg(self, fg: Color) -> Self {
        Self { fg, ..self }
    }

    /// Return a copy with a different background color.
    #[must_use]
    pub const fn with_bg(self, bg: Color) -> Self {
        Self { bg, ..self }
    }

    /// Return a copy with different modifiers.
    #[must_use]
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Whether this is the empty tile.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::BLACK.r, 0);
        assert_eq!(Color::WHITE.r, 255);
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::BLACK.is_transparent());
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(
            Color::from_hex("#0000ff80").unwrap(),
            Color::new(0, 0, 255, 128)
        );
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert_eq!(Color::from_hex("zz0000"), Err(ColorParseError::InvalidHex));
        assert_eq!(Color::from_hex("#ff"), Err(ColorParseError::InvalidLength));
        assert_eq!(Color::from_hex(""), Err(ColorParseError::InvalidLength));
    }

    #[test]
    fn test_color_to_hex_round_trip() {
        let c = Color::rgb(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(Color::from_hex(&c.to_hex()).unwrap(), c);

        let translucent = Color::new(18, 52, 86, 120);
        assert_eq!(Color::from_hex(&translucent.to_hex()).unwrap(), translucent);
    }

    #[test]
    fn test_color_parse_error_display() {
        assert_eq!(
            ColorParseError::InvalidHex.to_string(),
            "invalid hex characters"
        );
        assert_eq!(
            ColorParseError::InvalidLength.to_string(),
            "invalid hex string length (expected 6 or 8)"
        );
    }

    #[test]
    fn test_modifiers_empty() {
        assert!(Modifiers::NONE.is_empty());
        assert!(!Modifiers::BOLD.is_empty());
    }

    #[test]
    fn test_modifiers_with_without() {
        let m = Modifiers::BOLD.with(Modifiers::ITALIC);
        assert!(m.contains(Modifiers::BOLD));
        assert!(m.contains(Modifiers::ITALIC));
        let m = m.without(Modifiers::BOLD);
        assert!(!m.contains(Modifiers::BOLD));
        assert!(m.contains(Modifiers::ITALIC));
    }

    #[test]
    fn test_modifiers_bit_ops() {
        let mut m = Modifiers::BOLD | Modifiers::UNDERLINE;
        m |= Modifiers::DIM;
        assert!(m.contains(Modifiers::BOLD | Modifiers::UNDERLINE | Modifiers::DIM));
        assert_eq!(m & Modifiers::BOLD, Modifiers::BOLD);
        assert_eq!(m & Modifiers::BLINK, Modifiers::NONE);
    }

    #[test]
    fn test_modifiers_from_bits() {
        let m = Modifiers::from_bits(0b0000_0011);
        assert!(m.contains(Modifiers::BOLD));
        assert!(m.contains(Modifiers::ITALIC));
        assert_eq!(m.bits(), 0b0000_0011);
    }

    #[test]
    fn test_tile_empty() {
        let tile = Tile::default();
        assert_eq!(tile, Tile::EMPTY);
        assert!(tile.is_empty());
        assert_eq!(tile.glyph, ' ');
    }

    #[test]
    fn test_tile_value_equality() {
        let a = Tile::new('X', Color::WHITE, Color::BLACK, Modifiers::BOLD);
        let b = Tile::new('X', Color::WHITE, Color::BLACK, Modifiers::BOLD);
        assert_eq!(a, b);
        assert_ne!(a, a.with_fg(Color::rgb(1, 2, 3)));
        assert_ne!(a, Tile::new('Y', Color::WHITE, Color::BLACK, Modifiers::BOLD));
    }

    #[test]
    fn test_tile_builders() {
        let tile = Tile::glyph('@')
            .with_fg(Color::rgb(10, 20, 30))
            .with_bg(Color::BLACK)
            .with_modifiers(Modifiers::REVERSE);
        assert_eq!(tile.glyph, '@');
        assert_eq!(tile.fg, Color::rgb(10, 20, 30));
        assert_eq!(tile.bg, Color::BLACK);
        assert!(tile.modifiers.contains(Modifiers::REVERSE));
        assert!(!tile.is_empty());
    }
}
