//! Pool row widget
//!
//! Renders one participant on a single line:
//!
//! ```text
//! ● █ Alice                       3×   37.5%
//! ```
//!
//! The swatch uses the participant's wheel segment color.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::entry::Entry;
use super::theme::Theme;

/// Pool row widget
pub struct EntryRow<'a> {
    entry: &'a Entry,
    theme: &'a Theme,
    segment: Color,
    selected: bool,
    prefix: &'a str,
    chance: Option<f64>,
}

impl<'a> EntryRow<'a> {
    pub fn new(entry: &'a Entry, theme: &'a Theme, segment: Color) -> Self {
        Self {
            entry,
            theme,
            segment,
            selected: false,
            prefix: "",
            chance: None,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    /// Probability of winning the next draw, shown as a percentage
    pub fn chance(mut self, chance: Option<f64>) -> Self {
        self.chance = chance;
        self
    }
}

impl<'a> Widget for EntryRow<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = if self.selected { self.theme.selection_bg } else { self.theme.background };
        let fg = if self.selected { self.theme.selection_fg } else { self.theme.foreground };

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_bg(bg);
            }
        }

        let right = area.x + area.width;
        let mut x = area.x;

        // Prefix + swatch
        let prefix_style = Style::default().fg(self.theme.accent).bg(bg);
        let (after_prefix, _) = buf.set_stringn(x, area.y, self.prefix, area.width as usize, prefix_style);
        x = after_prefix;
        if x + 2 <= right {
            buf.set_string(x, area.y, "█ ", Style::default().fg(self.segment).bg(bg));
            x += 2;
        }

        // Right-aligned columns: weight, then chance
        let weight = format!("{}×", self.entry.weight());
        let chance = self.chance.map(format_chance).unwrap_or_default();
        let columns = if chance.is_empty() {
            weight.clone()
        } else {
            format!("{:>5} {:>7}", weight, chance)
        };
        let columns_width = columns.width() as u16 + 1;

        let name_width = right.saturating_sub(x).saturating_sub(columns_width) as usize;
        let mut name_style = Style::default().fg(fg).bg(bg);
        if self.selected {
            name_style = name_style.add_modifier(Modifier::BOLD);
        }
        buf.set_string(x, area.y, truncate(self.entry.name(), name_width), name_style);

        if name_width > 0 {
            let col_x = right.saturating_sub(columns_width) + 1;
            buf.set_string(col_x, area.y, &columns, Style::default().fg(self.theme.dimmed).bg(bg));
        }
    }
}

/// Format a probability as a percentage with one decimal
pub fn format_chance(chance: f64) -> String {
    format!("{:.1}%", chance * 100.0)
}

/// Truncate string to fit within max_width, adding ellipsis if needed
pub fn truncate(s: &str, max_width: usize) -> String {
    let width = s.width();
    if width <= max_width {
        s.to_string()
    } else if max_width == 0 {
        String::new()
    } else if max_width == 1 {
        "…".to_string()
    } else {
        let mut result = String::new();
        let mut current_width = 0;

        for c in s.chars() {
            let char_width = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width + 1 > max_width {
                result.push('…');
                break;
            }
            result.push(c);
            current_width += char_width;
        }

        result
    }
}
