//! Stateless rendering of a [`Snapshot`].

use luffarschack_engine::{LifetimeStats, Mark, Position, Square};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::session::Snapshot;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, snapshot: &Snapshot, cursor: Position) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(4), // Stats
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Luffarschack - Tic Tac Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_stats(frame, chunks[1], snapshot.stats());
    draw_board(frame, chunks[2], snapshot, cursor);

    let (text, color) = status_line(snapshot);
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[3]);

    let help = Paragraph::new("arrows: move  enter/1-9: place  r: new game  q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

/// Text and color of the status line.
///
/// A failed stats write is appended to the game message rather than
/// replacing it.
pub fn status_line(snapshot: &Snapshot) -> (String, Color) {
    if let Some(fault) = snapshot.fault() {
        return (format!("Internal error: {}", fault), Color::Red);
    }
    let (mut text, color) = match snapshot.status().banner() {
        Some(banner) => {
            let color = match snapshot.status().winner() {
                Some(Mark::Player) => Color::Green,
                Some(Mark::Opponent) => Color::Red,
                None => Color::Yellow,
            };
            (format!("{}  Press 'r' to play again.", banner), color)
        }
        None if *snapshot.thinking() => ("Computer is thinking...".to_string(), Color::Yellow),
        None => ("Your turn".to_string(), Color::Yellow),
    };
    if let Some(err) = snapshot.persistence_error() {
        text.push_str(&format!("  (stats not saved: {})", err));
    }
    (text, color)
}

fn draw_stats(frame: &mut Frame, area: Rect, stats: &LifetimeStats) {
    let lines = vec![
        Line::from(format!(
            "Player Wins: {}   Computer Wins: {}   Ties: {}",
            stats.player_wins, stats.computer_wins, stats.ties
        )),
        Line::from(format!(
            "W/L Ratio: {:.2}   Tie %: {:.1}%",
            stats.win_loss_ratio(),
            stats.tie_percentage()
        )),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title("Lifetime").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: Position) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    let show_cursor = snapshot.accepts_player_input();
    for row in 0..3 {
        draw_row(frame, rows[row * 2], snapshot, show_cursor.then_some(cursor), row);
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: Option<Position>, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for col in 0..3 {
        if let Some(pos) = Position::from_row_col(row, col) {
            draw_cell(frame, cols[col * 2], snapshot, cursor, pos);
        }
        if col < 2 {
            let sep = Paragraph::new("│").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, cols[col * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, snapshot: &Snapshot, cursor: Option<Position>, pos: Position) {
    let square = snapshot.board().get(pos.index()).unwrap_or_default();

    let (symbol, base_style) = match square {
        Square::Empty => (
            format!(" {} ", pos.index() + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Square::Occupied(mark) => (format!(" {} ", mark), mark_style(mark)),
    };

    let style = if cursor == Some(pos) {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(symbol, style))).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn mark_style(mark: Mark) -> Style {
    let color = match mark {
        Mark::Player => Color::Blue,
        Mark::Opponent => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─────────────────────────────────────────")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}
