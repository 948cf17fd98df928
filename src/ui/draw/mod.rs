//! Drawing functions for the TUI
//!
//! ```text
//! ┌ spinwheel ─────────────────────────────────────────────┐
//! │❯ filter                                                │
//! └────────────────────────────────────────────────────────┘
//! ┌ Pool 4/5 ───────────────────┐┌ Wheel ─────────────────┐
//! │● █ Alice        3×   37.5%  ││        Bob             │
//! │  █ Bob          1×   12.5%  ││   ▶    Carol    ◀      │
//! │                             │└────────────────────────┘
//! │                             │┌ Winners ───────────────┐
//! │                             ││ 1. Dave  (2×)  09:30:12│
//! └─────────────────────────────┘└────────────────────────┘
//!  status
//! ```
//!
//! - `editor` - participant editor (replaces the body while editing)
//! - `pool` - filter bar and remaining participants
//! - `wheel` - spin reel and winner announcement
//! - `winners` - draw history

mod editor;
mod pool;
mod wheel;
mod winners;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Paragraph},
    Frame,
};
use std::time::Instant;

use crate::app::{App, AppMode, StatusKind};
use crate::ui::theme::Theme;

use pool::{draw_filter_bar, draw_pool};
use wheel::draw_wheel;
use winners::draw_winners;

/// Height of the wheel panel including borders
const WHEEL_HEIGHT: u16 = 7;

/// Main draw function
pub fn draw(f: &mut Frame, app: &App, theme: &Theme, now: Instant) {
    // Fill background with theme color
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter bar
            Constraint::Min(1),    // Pool | wheel + winners
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    if let AppMode::Editing { editor } = app.mode() {
        editor::draw_input(f, app, editor, chunks[0], theme);
        editor::draw_rows(f, app, editor, chunks[1], theme);
        draw_status_bar(f, app, chunks[2], theme);
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(WHEEL_HEIGHT), Constraint::Min(1)])
        .split(body[1]);

    draw_filter_bar(f, app, chunks[0], theme);
    draw_pool(f, app, body[0], theme);
    draw_wheel(f, app, right[0], theme, now);
    draw_winners(f, app, right[1], theme);
    draw_status_bar(f, app, chunks[2], theme);
}

/// Draw the status bar: last message, or key hints
fn draw_status_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let (text, color) = match app.status() {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => theme.dimmed,
                StatusKind::Error => theme.error,
            };
            (format!(" {}", status.text), color)
        }
        None if app.is_editing() => (
            " Enter: add (empty line: apply) | ←→: weight | Del: remove | Ctrl+U: clear | Esc: cancel"
                .to_string(),
            theme.dimmed,
        ),
        None if app.is_filtering() => (
            format!(" {} matches | ESC: clear | Enter: draw", app.visible_entries().len()),
            theme.dimmed,
        ),
        None => (
            " Space: draw | r: reset | m: edit | e: export | /: filter | q: quit".to_string(),
            theme.dimmed,
        ),
    };

    let status_bar = Paragraph::new(text).style(Style::default().fg(color).bg(theme.background));
    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entry::Entry;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        let theme = Theme::darkwall();
        terminal
            .draw(|f| draw(f, app, &theme, Instant::now()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_draw_without_pool() {
        let app = App::new(Config::default(), None);
        let out = screen(&app);
        assert!(out.contains("No participants loaded"));
    }

    #[test]
    fn test_draw_editor() {
        let mut app = App::new(Config::default(), None);
        app.start_edit();
        app.edit(|e| e.add("Zelda", 4));

        let out = screen(&app);
        assert!(out.contains("Add participant"));
        assert!(out.contains("Participants (1, 4 tickets)"));
        assert!(out.contains("Zelda"));
    }

    #[test]
    fn test_draw_pool_and_winner() {
        let mut config = Config::default();
        config.spin.enabled = false;
        let mut app = App::new(config, Some(3));
        app.load_pool(vec![
            Entry::new("Alice", 3).unwrap(),
            Entry::new("Bob", 1).unwrap(),
        ])
        .unwrap();
        let record = app.draw().unwrap();

        let out = screen(&app);
        assert!(out.contains("Pool 1/2"));
        assert!(out.contains("Winners (1)"));
        assert!(out.contains(&record.name));
        assert!(out.contains("Winner:"));
    }
}
