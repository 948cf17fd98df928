//! Wheel panel
//!
//! While spinning, a vertical reel scrolls past a fixed pointer:
//!
//! ```text
//!      Alice
//!  ▶   Bob     ◀
//!      Carol
//! ```
//!
//! Once the animation ends the panel announces the winner.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

use crate::app::{App, AppMode};
use crate::entry::Entry;
use crate::ui::entry_row::truncate;
use crate::ui::theme::Theme;

pub(super) fn draw_wheel(f: &mut Frame, app: &App, area: Rect, theme: &Theme, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(" Wheel ")
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let lines = match app.mode() {
        AppMode::Spinning { .. } => match app.spin_frame(now) {
            Some((wheel, index, _)) => reel_lines(wheel, index, inner, theme),
            None => Vec::new(),
        },
        AppMode::Announce { record } => {
            let name_width = (inner.width as usize).saturating_sub(10);
            vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled("Winner: ", Style::default().fg(theme.dimmed)),
                    Span::styled(
                        truncate(&record.name, name_width),
                        Style::default().fg(theme.winner).add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::styled(
                    format!("weight {}", record.weight),
                    Style::default().fg(theme.dimmed_alt),
                ),
            ]
        }
        AppMode::Idle | AppMode::Editing { .. } => {
            let hint = if !app.has_session() {
                "Press m to add participants"
            } else if app.pool().is_empty() {
                "Pool is empty. Press r to reset."
            } else {
                "Press Space to spin"
            };
            vec![
                Line::from(""),
                Line::styled(hint, Style::default().fg(theme.dimmed)),
            ]
        }
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.background));
    f.render_widget(panel, inner);
}

/// Reel rows centred on the entry under the pointer
fn reel_lines<'a>(wheel: &'a [Entry], index: usize, inner: Rect, theme: &Theme) -> Vec<Line<'a>> {
    if wheel.is_empty() {
        return Vec::new();
    }

    let rows = inner.height as usize;
    let center = rows / 2;
    let name_width = (inner.width as usize).saturating_sub(6);

    (0..rows)
        .map(|row| {
            // wrap around the wheel in both directions
            let offset = row as isize - center as isize;
            let i = (index as isize + offset).rem_euclid(wheel.len() as isize) as usize;
            let name = truncate(wheel[i].name(), name_width);
            let segment = theme.segment(i);

            if row == center {
                Line::from(vec![
                    Span::styled("▶ ", Style::default().fg(theme.accent)),
                    Span::styled(
                        name,
                        Style::default()
                            .fg(theme.background)
                            .bg(segment)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" ◀", Style::default().fg(theme.accent)),
                ])
            } else {
                Line::styled(name, Style::default().fg(segment))
            }
        })
        .collect()
}
