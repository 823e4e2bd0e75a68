//! TUI entry point and terminal setup.

use std::io::{self, Write};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::api::TaskApi;
use crate::board::Board;
use crate::tui::app::App;

/// Initialise the terminal, run the board UI and restore the terminal.
///
/// The terminal is restored on every exit path once raw mode is on.
pub async fn run_tui<A: TaskApi>(board: &mut Board<A>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        restore(&mut stdout).ok();
        return Err(e);
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            restore(&mut io::stdout()).ok();
            return Err(e);
        }
    };

    let mut app = App::new(board);
    let result = app.run(&mut terminal).await;

    let restored = restore(terminal.backend_mut());
    terminal.show_cursor()?;
    restored?;

    result
}

/// Leave the alternate screen and raw mode.
fn restore<W: Write>(out: &mut W) -> io::Result<()> {
    let screen = execute!(out, LeaveAlternateScreen, DisableMouseCapture);
    disable_raw_mode()?;
    screen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_leaves_alternate_screen() {
        let mut out: Vec<u8> = Vec::new();
        restore(&mut out).unwrap();
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains("\u{1b}[?1049l"));
    }
}
