//! Filter bar and the remaining pool

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::entry_row::EntryRow;
use crate::ui::layout::ListWindow;
use crate::ui::theme::Theme;

/// Draw the search/filter bar
pub(super) fn draw_filter_bar(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let config = app.config();

    let filter_text = if app.is_filtering() || !app.filter_text().is_empty() {
        format!("{}{}", config.appearance.prompt, app.filter_text())
    } else {
        format!("{}/ to filter participants", config.appearance.prompt)
    };

    let style = if app.is_filtering() {
        Style::default()
            .fg(theme.search_highlight)
            .bg(theme.background)
    } else {
        Style::default().fg(theme.dimmed).bg(theme.background)
    };

    let search = Paragraph::new(filter_text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" spinwheel ")
            .style(Style::default().bg(theme.background)),
    );

    f.render_widget(search, area);

    // Show cursor in filter mode
    if app.is_filtering() {
        // +1 for the left border
        let prompt_width = config.appearance.prompt.width() as u16;
        let filter_width = app.filter_text().width() as u16;
        let cursor_x = area.x + 1 + prompt_width + filter_width;
        let cursor_y = area.y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Draw the participants still in the pool
pub(super) fn draw_pool(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let config = app.config();
    let entries = app.visible_entries();
    let selected = app.selected_index();

    let title = if app.has_session() {
        format!(" Pool {}/{} ", app.pool().len(), app.original_len())
    } else {
        " Pool ".to_string()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed_alt))
        .title(title)
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    if entries.is_empty() {
        let message = if !app.has_session() {
            "No participants loaded"
        } else if app.pool().is_empty() {
            "Everyone has been drawn. Press r to reset."
        } else {
            "No matches"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme.dimmed_alt).bg(theme.background));
        f.render_widget(empty, inner);
        return;
    }

    let window = ListWindow::new(inner.height);
    let range = window.visible_range(selected, entries.len());
    let page_start = range.start;

    for (row, (wheel_index, entry)) in entries[range].iter().enumerate() {
        let is_selected = page_start + row == selected;
        let prefix = if is_selected {
            config.appearance.selected_prefix.as_str()
        } else {
            config.appearance.unselected_prefix.as_str()
        };
        let chance = config.appearance.show_chance.then(|| app.chance(entry)).flatten();

        let row_area = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let widget = EntryRow::new(entry, theme, theme.segment(*wheel_index))
            .selected(is_selected)
            .prefix(prefix)
            .chance(chance);
        f.render_widget(widget, row_area);
    }
}
