//! Crossterm-backed [`TileSurface`] implementation.

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color as CrosstermColor, Print, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::{queue, QueueableCommand};
use std::io::{self, BufWriter, Write};
use tessera_core::{Color, Modifiers, Position, Size, Tile, TileSurface};
use tracing::debug;
use unicode_width::UnicodeWidthChar;

const WRITE_BUFFER_CAPACITY: usize = 8192;

/// Sentinel for an unknown cursor column or row.
const UNKNOWN: u16 = u16::MAX;

/// Style last emitted to the terminal.
#[derive(Clone, Copy, Debug, PartialEq)]
struct StyleState {
    fg: Color,
    bg: Color,
    modifiers: Modifiers,
}

/// A terminal surface writing escape sequences through a buffered writer.
///
/// Tracks the cursor position and the last emitted style so consecutive tiles
/// on the same row with the same style cost one `Print` each, with no
/// redundant `MoveTo` or color sequences in between. Everything is queued
/// into an internal buffer; nothing reaches the terminal until
/// [`TileSurface::flush`].
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    writer: BufWriter<W>,
    bound: Size,
    // UNKNOWN after a wrap, a resize, or before the first write.
    cursor_x: u16,
    cursor_y: u16,
    last_style: Option<StyleState>,
    cells_written: usize,
    cursor_moves: usize,
    style_changes: usize,
}

impl TerminalSurface<io::Stdout> {
    /// A surface on stdout, sized to the current terminal.
    ///
    /// # Errors
    ///
    /// Fails when the terminal size cannot be queried.
    pub fn stdout() -> io::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self::new(io::stdout(), Size::new(width, height)))
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Wrap a writer, reporting the given bound.
    #[must_use]
    pub fn new(writer: W, bound: Size) -> Self {
        Self {
            writer: BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, writer),
            bound,
            cursor_x: UNKNOWN,
            cursor_y: UNKNOWN,
            last_style: None,
            cells_written: 0,
            cursor_moves: 0,
            style_changes: 0,
        }
    }

    /// Adopt a new bound after the terminal was resized.
    ///
    /// Invalidates the tracked cursor and style state.
    pub fn resize(&mut self, bound: Size) {
        self.bound = bound;
        self.invalidate();
    }

    /// Forget tracked cursor and style state.
    ///
    /// Call after anything else wrote to the terminal.
    pub fn invalidate(&mut self) {
        self.cursor_x = UNKNOWN;
        self.cursor_y = UNKNOWN;
        self.last_style = None;
    }

    /// Tiles written since creation.
    #[must_use]
    pub const fn cells_written(&self) -> usize {
        self.cells_written
    }

    /// `MoveTo` sequences emitted since creation.
    #[must_use]
    pub const fn cursor_moves(&self) -> usize {
        self.cursor_moves
    }

    /// Style sequences emitted since creation.
    #[must_use]
    pub const fn style_changes(&self) -> usize {
        self.style_changes
    }

    /// Unwrap the underlying writer, flushing buffered output.
    ///
    /// # Errors
    ///
    /// Propagates the flush failure, if any.
    pub fn into_writer(self) -> io::Result<W> {
        self.writer.into_inner().map_err(io::IntoInnerError::into_error)
    }

    fn apply_style(&mut self, style: StyleState) -> io::Result<()> {
        // Attributes reset first, then colors, then modifiers; a reset after
        // the colors would wipe them out.
        self.writer.queue(SetAttribute(Attribute::Reset))?;
        self.writer
            .queue(SetForegroundColor(to_crossterm_color(style.fg)))?;
        self.writer
            .queue(SetBackgroundColor(to_crossterm_color(style.bg)))?;

        for (flag, attribute) in [
            (Modifiers::BOLD, Attribute::Bold),
            (Modifiers::ITALIC, Attribute::Italic),
            (Modifiers::UNDERLINE, Attribute::Underlined),
            (Modifiers::STRIKETHROUGH, Attribute::CrossedOut),
            (Modifiers::DIM, Attribute::Dim),
            (Modifiers::BLINK, Attribute::SlowBlink),
            (Modifiers::REVERSE, Attribute::Reverse),
            (Modifiers::HIDDEN, Attribute::Hidden),
        ] {
            if style.modifiers.contains(flag) {
                self.writer.queue(SetAttribute(attribute))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> TileSurface for TerminalSurface<W> {
    fn size(&self) -> Size {
        self.bound
    }

    fn set_tile_at(&mut self, position: Position, tile: Tile) -> io::Result<()> {
        if !self.bound.contains(position) {
            return Ok(());
        }

        if self.cursor_x != position.x || self.cursor_y != position.y {
            queue!(self.writer, MoveTo(position.x, position.y))?;
            self.cursor_x = position.x;
            self.cursor_y = position.y;
            self.cursor_moves += 1;
        }

        let style = StyleState {
            fg: tile.fg,
            bg: tile.bg,
            modifiers: tile.modifiers,
        };
        if self.last_style != Some(style) {
            self.apply_style(style)?;
            self.last_style = Some(style);
            self.style_changes += 1;
        }

        queue!(self.writer, Print(tile.glyph))?;
        self.cells_written += 1;

        let advance = tile.glyph.width().unwrap_or(0) as u16;
        self.cursor_x = self.cursor_x.saturating_add(advance);
        if self.cursor_x >= self.bound.width {
            // The terminal's wrap behavior is not ours to predict.
            self.cursor_x = UNKNOWN;
        }
        Ok(())
    }

    fn set_cursor_visibility(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.writer, Show)
        } else {
            queue!(self.writer, Hide)
        }
    }

    fn put_cursor_at(&mut self, position: Position) -> io::Result<()> {
        queue!(self.writer, MoveTo(position.x, position.y))?;
        self.cursor_x = position.x;
        self.cursor_y = position.y;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        debug!(
            cells = self.cells_written,
            moves = self.cursor_moves,
            styles = self.style_changes,
            "terminal flush"
        );
        Ok(())
    }
}

/// Map a tile color to crossterm's palette.
///
/// Transparent maps to `Reset`, the terminal's own default.
fn to_crossterm_color(color: Color) -> CrosstermColor {
    if color.is_transparent() {
        CrosstermColor::Reset
    } else {
        CrosstermColor::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(bound: Size) -> TerminalSurface<Vec<u8>> {
        TerminalSurface::new(Vec::new(), bound)
    }

    fn output(surface: TerminalSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.into_writer().unwrap()).unwrap()
    }

    #[test]
    fn test_writes_glyph_with_move_and_style() {
        let mut s = surface(Size::new(10, 5));
        s.set_tile_at(Position::new(3, 1), Tile::glyph('X')).unwrap();
        s.flush().unwrap();

        assert_eq!(s.cells_written(), 1);
        assert_eq!(s.cursor_moves(), 1);
        assert_eq!(s.style_changes(), 1);
        let out = output(s);
        assert!(out.contains('X'));
        // MoveTo(3, 1) is 1-based in the escape sequence.
        assert!(out.contains("\u{1b}[2;4H"));
    }

    #[test]
    fn test_adjacent_same_style_tiles_share_one_move() {
        let mut s = surface(Size::new(10, 5));
        s.set_tile_at(Position::new(0, 0), Tile::glyph('A')).unwrap();
        s.set_tile_at(Position::new(1, 0), Tile::glyph('B')).unwrap();
        s.set_tile_at(Position::new(2, 0), Tile::glyph('C')).unwrap();

        assert_eq!(s.cursor_moves(), 1);
        assert_eq!(s.style_changes(), 1);
        assert!(output(s).contains("ABC"));
    }

    #[test]
    fn test_style_change_emits_new_sequence() {
        let mut s = surface(Size::new(10, 5));
        s.set_tile_at(Position::new(0, 0), Tile::glyph('a')).unwrap();
        s.set_tile_at(
            Position::new(1, 0),
            Tile::glyph('b').with_fg(Color::rgb(255, 0, 0)),
        )
        .unwrap();
        s.set_tile_at(
            Position::new(2, 0),
            Tile::glyph('c').with_fg(Color::rgb(255, 0, 0)),
        )
        .unwrap();

        assert_eq!(s.style_changes(), 2);
    }

    #[test]
    fn test_wide_glyph_invalidates_on_wrap() {
        let mut s = surface(Size::new(3, 2));
        s.set_tile_at(Position::new(1, 0), Tile::glyph('日')).unwrap();
        // Cursor advanced past the right edge: next write must re-position.
        s.set_tile_at(Position::new(0, 1), Tile::glyph('x')).unwrap();
        assert_eq!(s.cursor_moves(), 2);
    }

    #[test]
    fn test_out_of_bound_write_is_ignored() {
        let mut s = surface(Size::new(2, 2));
        s.set_tile_at(Position::new(5, 5), Tile::glyph('x')).unwrap();
        assert_eq!(s.cells_written(), 0);
        assert!(output(s).is_empty());
    }

    #[test]
    fn test_cursor_commands_are_queued() {
        let mut s = surface(Size::new(4, 4));
        s.set_cursor_visibility(false).unwrap();
        s.put_cursor_at(Position::new(1, 1)).unwrap();
        s.set_cursor_visibility(true).unwrap();
        s.flush().unwrap();

        let out = output(s);
        assert!(out.contains("\u{1b}[?25l"));
        assert!(out.contains("\u{1b}[?25h"));
        assert!(out.contains("\u{1b}[2;2H"));
    }

    #[test]
    fn test_transparent_background_resets_to_terminal_default() {
        assert_eq!(
            to_crossterm_color(Color::TRANSPARENT),
            CrosstermColor::Reset
        );
        assert_eq!(
            to_crossterm_color(Color::rgb(1, 2, 3)),
            CrosstermColor::Rgb { r: 1, g: 2, b: 3 }
        );
    }

    #[test]
    fn test_resize_invalidates_tracking() {
        let mut s = surface(Size::new(10, 5));
        s.set_tile_at(Position::new(0, 0), Tile::glyph('a')).unwrap();
        s.resize(Size::new(8, 4));
        assert_eq!(s.size(), Size::new(8, 4));

        // Same coordinate again still needs a fresh MoveTo and style.
        s.set_tile_at(Position::new(1, 0), Tile::glyph('b')).unwrap();
        assert_eq!(s.cursor_moves(), 2);
        assert_eq!(s.style_changes(), 2);
    }

    #[test]
    fn test_modifier_attributes_emitted() {
        let mut s = surface(Size::new(4, 4));
        s.set_tile_at(
            Position::ORIGIN,
            Tile::glyph('m').with_modifiers(Modifiers::BOLD.with(Modifiers::UNDERLINE)),
        )
        .unwrap();

        let out = output(s);
        // Bold and underline SGR codes.
        assert!(out.contains("\u{1b}[1m"));
        assert!(out.contains("\u{1b}[4m"));
    }
}
