//! Draw history, oldest first

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::entry_row::truncate;
use crate::ui::layout::ListWindow;
use crate::ui::theme::Theme;

pub(super) fn draw_winners(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let winners = app.winners();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(format!(" Winners ({}) ", winners.len()))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Newest winners stay visible
    let range = ListWindow::new(inner.height).tail_range(winners.len());
    let last = winners.len().saturating_sub(1);

    let lines: Vec<Line> = winners[range.clone()]
        .iter()
        .zip(range)
        .map(|(record, i)| {
            let number = format!("{:>3}. ", i + 1);
            let suffix = format!(" ({}×) {}", record.weight, record.drawn_at.format("%H:%M:%S"));
            let name_width = (inner.width as usize).saturating_sub(number.len() + suffix.chars().count());

            let mut name_style = Style::default().fg(theme.foreground);
            if i == last {
                name_style = name_style.fg(theme.winner).add_modifier(Modifier::BOLD);
            }

            Line::from(vec![
                Span::styled(number, Style::default().fg(theme.dimmed_alt)),
                Span::styled(truncate(&record.name, name_width), name_style),
                Span::styled(suffix, Style::default().fg(theme.dimmed)),
            ])
        })
        .collect();

    let list = Paragraph::new(lines).style(Style::default().bg(theme.background));
    f.render_widget(list, inner);
}
