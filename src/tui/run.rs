//! Terminal UI entry point and setup.

use std::io;

use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tracing::info;

use crate::db::TaskStorage;
use crate::store::TaskStore;
use crate::tui::app::App;
use crate::window::WindowHost;

/// Initialise the terminal, run the UI until it quits, then restore the terminal.
pub fn run_tui<S: TaskStorage>(store: TaskStore<S>, window: Option<Box<dyn WindowHost>>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!(tasks = store.list().len(), "starting terminal UI");

    let mut app = App::new(store, window);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableFocusChange)?;
    terminal.show_cursor()?;

    result
}
