//! Scrolling for the pool and winners lists
//!
//! Lists scroll a page at a time, so the selection never jumps around
//! inside the visible rows while moving through a page.

use std::ops::Range;

/// Paged window over a list
#[derive(Debug, Clone, Copy)]
pub struct ListWindow {
    /// Number of visible rows
    pub visible_rows: usize,
}

impl ListWindow {
    pub fn new(visible_rows: u16) -> Self {
        Self {
            visible_rows: (visible_rows as usize).max(1),
        }
    }

    /// Range of rows shown when `selected` is the highlighted row
    pub fn visible_range(&self, selected: usize, total: usize) -> Range<usize> {
        if total == 0 {
            return 0..0;
        }

        let selected = selected.min(total - 1);
        let start = (selected / self.visible_rows) * self.visible_rows;
        start..(start + self.visible_rows).min(total)
    }

    /// Last rows of the list, for lists that grow at the bottom
    pub fn tail_range(&self, total: usize) -> Range<usize> {
        total.saturating_sub(self.visible_rows)..total
    }
}
