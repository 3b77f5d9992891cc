//! Terminal UI for Luffarschack.

mod input;
mod ui;

pub use input::{Intent, key_to_intent, move_cursor};
pub use ui::{draw, status_line};

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use luffarschack_engine::Position;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error, info, instrument};

use crate::runner::SessionHandle;

/// How long to wait for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the game screen until the player quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run_tui(handle: &SessionHandle) -> Result<()> {
    info!("Starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game(&mut terminal, handle).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

#[instrument(skip_all)]
async fn run_game(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &SessionHandle,
) -> Result<()> {
    let mut cursor = Position::Center;

    loop {
        let snapshot = handle.snapshot();
        terminal.draw(|f| draw(f, &snapshot, cursor))?;

        if !event::poll(POLL_INTERVAL)? {
            // Let the session actor publish while we wait.
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key_to_intent(cursor, key.code) {
            Intent::Quit => {
                info!("User quit");
                return Ok(());
            }
            Intent::Reset => handle.reset_game()?,
            Intent::Cursor(next) => cursor = next,
            Intent::Place(cell) => {
                if snapshot.accepts_player_input() {
                    cursor = Position::from_index(cell).unwrap_or(cursor);
                    handle.handle_player_move(cell)?;
                } else {
                    debug!(cell, "Ignoring input while board is locked");
                }
            }
            Intent::Ignore => {}
        }
    }
}
