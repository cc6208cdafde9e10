//! Raw-mode terminal session guard.

use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use std::io::{self, Write};
use tracing::warn;

/// Puts the terminal into raw mode on the alternate screen, restoring it on
/// drop.
///
/// Hold one for the lifetime of the UI. The drop path swallows restore
/// failures: the process is usually exiting and there is nowhere left to
/// report them.
#[derive(Debug)]
pub struct TerminalSession {
    restored: bool,
}

impl TerminalSession {
    /// Enter raw mode and switch to the alternate screen.
    ///
    /// # Errors
    ///
    /// Fails when the terminal rejects either transition; anything already
    /// applied is rolled back.
    pub fn begin() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        Ok(Self { restored: false })
    }

    /// Restore the terminal explicitly, reporting failures.
    ///
    /// # Errors
    ///
    /// Propagates the first restore step that fails.
    pub fn end(mut self) -> io::Result<()> {
        self.restored = true;
        restore()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(err) = restore() {
                warn!(error = %err, "terminal restore failed");
            }
        }
    }
}

fn restore() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    stdout.flush()
}
