//! Keyboard handling: cursor movement and key-to-intent mapping.

use crossterm::event::KeyCode;
use luffarschack_engine::Position;

/// What a key press asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move the cursor.
    Cursor(Position),
    /// Place a mark at the given cell.
    Place(usize),
    /// Start a new game.
    Reset,
    /// Leave the game.
    Quit,
    /// Key has no meaning here.
    Ignore,
}

/// Moves the cursor one step with the arrow keys, stopping at the edges.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let target = match key {
        KeyCode::Up => Position::from_row_col(row.wrapping_sub(1), col),
        KeyCode::Down => Position::from_row_col(row + 1, col),
        KeyCode::Left => Position::from_row_col(row, col.wrapping_sub(1)),
        KeyCode::Right => Position::from_row_col(row, col + 1),
        _ => None,
    };
    target.unwrap_or(cursor)
}

/// Maps a key to an [`Intent`] given the current cursor.
pub fn key_to_intent(cursor: Position, key: KeyCode) -> Intent {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        KeyCode::Char('r') => Intent::Reset,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::Place(cursor.index()),
        KeyCode::Char(c) => match Position::from_key_or_label(&c.to_string()) {
            Some(pos) => Intent::Place(pos.index()),
            None => Intent::Ignore,
        },
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            Intent::Cursor(move_cursor(cursor, key))
        }
        _ => Intent::Ignore,
    }
}
