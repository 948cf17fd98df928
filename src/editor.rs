//! Participant editor shown inside the TUI.
//!
//! Builds a pool by hand before it becomes a draw session. Validation is
//! stricter than the file importer: nothing is coerced, a bad line is
//! rejected with the reason.
//!
//! ```text
//! input "Alice=3" ──Enter──▶ rows [Alice 3×, Bob 1×] ──apply──▶ App::load_pool
//! ```

use crate::entry::Entry;
use crate::error::DrawError;

#[derive(Debug, Clone, Default)]
pub struct Editor {
    rows: Vec<Entry>,
    selected: usize,
    input: String,
}

impl Editor {
    /// Start from an existing pool (empty for a fresh one)
    pub fn new(rows: Vec<Entry>) -> Self {
        Self {
            rows,
            selected: 0,
            input: String::new(),
        }
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Add a participant. Names are unique ignoring case.
    pub fn add(&mut self, name: &str, weight: u32) -> Result<(), DrawError> {
        let entry = Entry::new(name, weight)?;
        if self.rows.iter().any(|e| e.key() == entry.key()) {
            return Err(DrawError::duplicate(entry.name()));
        }
        self.rows.push(entry);
        self.selected = self.rows.len() - 1;
        Ok(())
    }

    /// Add the `NAME[=WEIGHT]` line typed so far. The input is kept when it
    /// is rejected so it can be corrected.
    pub fn submit_input(&mut self) -> Result<(), DrawError> {
        let line = self.input.clone();
        let (name, weight) = match line.rsplit_once('=') {
            Some((name, raw)) => {
                let weight = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| DrawError::invalid_weight(name.trim()))?;
                (name, weight)
            }
            None => (line.as_str(), 1),
        };
        self.add(name, weight)?;
        self.input.clear();
        Ok(())
    }

    /// Set the weight of the selected row
    pub fn set_weight(&mut self, weight: u32) -> Result<(), DrawError> {
        let Some(row) = self.rows.get_mut(self.selected) else {
            return Ok(());
        };
        *row = Entry::new(row.name(), weight)?;
        Ok(())
    }

    /// Raise or lower the selected row's weight by `delta`
    pub fn adjust_weight(&mut self, delta: i64) -> Result<(), DrawError> {
        let Some(row) = self.rows.get(self.selected) else {
            return Ok(());
        };
        let weight = i64::from(row.weight()) + delta;
        let weight = u32::try_from(weight).map_err(|_| DrawError::invalid_weight(row.name()))?;
        self.set_weight(weight)
    }

    /// Remove the selected row
    pub fn remove_selected(&mut self) -> Option<Entry> {
        if self.selected >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(self.selected);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.selected = 0;
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }
}
