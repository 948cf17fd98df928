//! Participant editor: input line plus the rows built so far

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::editor::Editor;
use crate::ui::entry_row::EntryRow;
use crate::ui::layout::ListWindow;
use crate::ui::theme::Theme;

/// Draw the `NAME[=WEIGHT]` input line
pub(super) fn draw_input(f: &mut Frame, app: &App, editor: &Editor, area: Rect, theme: &Theme) {
    let prompt = &app.config().appearance.prompt;
    let text = format!("{}{}", prompt, editor.input());

    let input = Paragraph::new(text)
        .style(Style::default().fg(theme.search_highlight).bg(theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.accent))
                .title(" Add participant: NAME or NAME=WEIGHT ")
                .style(Style::default().bg(theme.background)),
        );
    f.render_widget(input, area);

    // +1 for the left border
    let cursor_x = area.x + 1 + prompt.width() as u16 + editor.input().width() as u16;
    f.set_cursor_position((cursor_x, area.y + 1));
}

/// Draw the participants in the editor
pub(super) fn draw_rows(f: &mut Frame, app: &App, editor: &Editor, area: Rect, theme: &Theme) {
    let config = app.config();
    let rows = editor.rows();
    let total: u64 = rows.iter().map(|e| u64::from(e.weight())).sum();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(format!(" Participants ({}, {} tickets) ", rows.len(), total))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if rows.is_empty() {
        let empty = Paragraph::new("No participants yet. Type a name and press Enter.")
            .style(Style::default().fg(theme.dimmed_alt).bg(theme.background));
        f.render_widget(empty, inner);
        return;
    }

    let selected = editor.selected_index();
    let range = ListWindow::new(inner.height).visible_range(selected, rows.len());
    let page_start = range.start;

    for (row, entry) in rows[range].iter().enumerate() {
        let index = page_start + row;
        let is_selected = index == selected;
        let prefix = if is_selected {
            config.appearance.selected_prefix.as_str()
        } else {
            config.appearance.unselected_prefix.as_str()
        };
        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let widget = EntryRow::new(entry, theme, theme.segment(index))
            .selected(is_selected)
            .prefix(prefix);
        f.render_widget(widget, row_area);
    }
}
