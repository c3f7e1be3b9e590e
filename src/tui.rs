//! Terminal lifecycle for hosts of the demo binary.
//!
//! Raw mode, alternate screen, and mouse capture — mouse capture is what
//! feeds exit-intent and click triggers. A panic hook restores the terminal
//! before the report prints.

use std::io::{self, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enters raw mode and the alternate screen with mouse capture enabled.
///
/// # Errors
///
/// Returns an error if the terminal cannot be configured.
pub fn init() -> io::Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

    set_panic_hook();

    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend)
}

fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        hook(panic_info);
    }));
}

/// Leaves the alternate screen and disables raw mode and mouse capture.
///
/// # Errors
///
/// Returns an error if the terminal state cannot be restored.
pub fn restore() -> io::Result<()> {
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()
}
