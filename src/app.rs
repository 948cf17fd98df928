use anyhow::Result;
use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Matcher,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::config::Config;
use crate::entry::{DrawRecord, Entry};
use crate::error::DrawError;
use crate::export;
use crate::selector::WeightedSelector;
use crate::editor::Editor;
use crate::session::DrawSession;
use crate::spin::SpinAnimation;
use crate::store::SessionStore;

/// Application mode - determines what the wheel panel shows
#[derive(Debug, Clone)]
pub enum AppMode {
    /// Waiting for the next draw
    Idle,
    /// Replaying an already decided draw
    Spinning {
        spin: SpinAnimation,
        started: Instant,
        /// Pool as it was before the draw, in wheel order
        wheel: Vec<Entry>,
        record: DrawRecord,
    },
    /// Showing the latest winner
    Announce { record: DrawRecord },
    /// Editing participants by hand; applying starts a new session
    Editing { editor: Editor },
}

/// Status line severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// Application state
pub struct App {
    /// Current application mode
    mode: AppMode,
    /// Owns the draw sessions
    store: SessionStore,
    /// Session for the loaded pool
    active: Option<Uuid>,
    /// Seed for reproducible draws (`--seed`)
    seed: Option<u64>,
    /// Remaining pool, refreshed after every mutation
    pool: Vec<Entry>,
    /// Winners so far, refreshed after every mutation
    winners: Vec<DrawRecord>,
    /// Size of the loaded pool
    original_len: usize,
    /// Filtered pool (indices into `pool`)
    filtered: Vec<usize>,
    /// Currently selected index in filtered list
    selected: usize,
    /// Current filter text
    filter: String,
    /// Whether we're in filter input mode
    filtering: bool,
    /// Last message for the status bar
    status: Option<StatusMessage>,
    /// Configuration
    config: Config,
    /// Fuzzy matcher
    matcher: Matcher,
    /// Randomness for the animation only
    spin_rng: StdRng,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        Self {
            mode: AppMode::Idle,
            store: SessionStore::new(),
            active: None,
            seed,
            pool: Vec::new(),
            winners: Vec::new(),
            original_len: 0,
            filtered: Vec::new(),
            selected: 0,
            filter: String::new(),
            filtering: false,
            status: None,
            config,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            spin_rng: StdRng::from_entropy(),
        }
    }

    /// Replace the pool with `entries`, discarding the previous session
    pub fn load_pool(&mut self, entries: Vec<Entry>) -> Result<(), DrawError> {
        let id = match self.seed {
            Some(seed) => self.store.insert(DrawSession::with_selector(
                entries,
                WeightedSelector::seeded(seed),
            )?),
            None => self.store.create(entries)?,
        };

        if let Some(old) = self.active.replace(id) {
            self.store.delete(old);
        }

        self.mode = AppMode::Idle;
        self.filter.clear();
        self.filtering = false;
        self.selected = 0;
        self.refresh()?;
        self.set_info(format!("Loaded {} participants", self.original_len));
        Ok(())
    }

    /// Whether a pool has been loaded
    pub fn has_session(&self) -> bool {
        self.active.is_some()
    }

    fn active_id(&self) -> Result<Uuid, DrawError> {
        self.active.ok_or(DrawError::NoActiveSession)
    }

    /// Pull the pool and winners out of the active session
    fn refresh(&mut self) -> Result<(), DrawError> {
        let id = self.active_id()?;
        let snapshot = self.store.snapshot(id)?;
        self.original_len = snapshot.original.len();
        self.pool = snapshot.current;
        self.winners = snapshot.history;
        self.update_filtered();
        Ok(())
    }

    /// Draw a winner. The result is final immediately; the animation (if
    /// enabled) only replays it.
    pub fn draw(&mut self) -> Result<DrawRecord, DrawError> {
        if self.is_spinning() {
            self.finish_spin();
        }

        let id = self.active_id()?;
        let wheel = self.pool.clone();
        let record = self.store.draw(id)?;
        self.refresh()?;

        let winner = wheel.iter().position(|e| e.name() == record.name);
        let weights: Vec<u32> = wheel.iter().map(Entry::weight).collect();
        let spin = if self.config.spin.enabled {
            winner.and_then(|w| SpinAnimation::new(&weights, w, &self.config.spin, &mut self.spin_rng))
        } else {
            None
        };

        self.mode = match spin {
            Some(spin) => AppMode::Spinning {
                spin,
                started: Instant::now(),
                wheel,
                record: record.clone(),
            },
            None => AppMode::Announce {
                record: record.clone(),
            },
        };
        self.status = None;
        Ok(record)
    }

    /// Advance the animation; called every frame
    pub fn tick(&mut self, now: Instant) {
        if let AppMode::Spinning { spin, started, .. } = &self.mode {
            if spin.is_finished(now.saturating_duration_since(*started)) {
                self.finish_spin();
            }
        }
    }

    /// Jump to the end of the animation
    pub fn finish_spin(&mut self) {
        if let AppMode::Spinning { record, .. } = &self.mode {
            let record = record.clone();
            self.set_info(format!("Winner: {}", record.name));
            self.mode = AppMode::Announce { record };
        }
    }

    /// Put every participant back
    pub fn reset(&mut self) -> Result<(), DrawError> {
        let id = self.active_id()?;
        self.store.reset(id)?;
        self.mode = AppMode::Idle;
        self.refresh()?;
        self.set_info("Pool reset");
        Ok(())
    }

    /// Write winners to `path`, or to the configured export file
    pub fn export(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let id = self.active_id()?;
        let history = self.store.export_history(id)?;
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.export.path());
        export::write_csv(&path, &history)?;
        self.set_info(format!("Exported {} winners to {}", history.len(), path.display()));
        Ok(path)
    }

    /// Open the participant editor on the loaded pool
    pub fn start_edit(&mut self) {
        if self.is_spinning() {
            self.finish_spin();
        }
        let rows = self
            .active
            .and_then(|id| self.store.with_session(id, |s| s.original_pool().to_vec()).ok())
            .unwrap_or_default();
        self.filter.clear();
        self.filtering = false;
        self.mode = AppMode::Editing {
            editor: Editor::new(rows),
        };
        self.status = None;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, AppMode::Editing { .. })
    }

    /// Editor state while editing
    pub fn editor(&self) -> Option<&Editor> {
        match &self.mode {
            AppMode::Editing { editor } => Some(editor),
            _ => None,
        }
    }

    /// Run `f` on the editor, reporting a rejected change in the status bar
    pub fn edit(&mut self, f: impl FnOnce(&mut Editor) -> Result<(), DrawError>) {
        let result = match &mut self.mode {
            AppMode::Editing { editor } => f(editor),
            _ => return,
        };
        match result {
            Ok(()) => self.status = None,
            Err(e) => self.report_error(e),
        }
    }

    /// Replace the pool with the edited participants. Winners so far are
    /// discarded with the old session.
    pub fn apply_edit(&mut self) -> Result<(), DrawError> {
        let rows = match &self.mode {
            AppMode::Editing { editor } => editor.rows().to_vec(),
            _ => return Ok(()),
        };
        // stays in the editor when the pool is rejected
        self.load_pool(rows)
    }

    /// Leave the editor without touching the session
    pub fn cancel_edit(&mut self) {
        if self.is_editing() {
            self.mode = AppMode::Idle;
        }
    }

    /// Remaining pool
    pub fn pool(&self) -> &[Entry] {
        &self.pool
    }

    /// Winners in draw order
    pub fn winners(&self) -> &[DrawRecord] {
        &self.winners
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Probability of `entry` winning the next draw
    pub fn chance(&self, entry: &Entry) -> Option<f64> {
        let id = self.active?;
        self.store
            .with_session(id, |s| s.chance_of(entry.name()))
            .ok()
            .flatten()
    }

    /// Get currently visible entries with their position on the wheel
    pub fn visible_entries(&self) -> Vec<(usize, &Entry)> {
        self.filtered.iter().map(|&i| (i, &self.pool[i])).collect()
    }

    /// Get selected index
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Move selection up
    pub fn previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move selection down
    pub fn next(&mut self) {
        if self.selected < self.filtered.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Check if currently filtering
    pub fn is_filtering(&self) -> bool {
        self.filtering
    }

    /// Start filter mode
    pub fn start_filter(&mut self) {
        self.filtering = true;
    }

    /// Clear filter and exit filter mode
    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filtering = false;
        self.update_filtered();
    }

    /// Get current filter text
    pub fn filter_text(&self) -> &str {
        &self.filter
    }

    /// Add character to filter
    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.update_filtered();
    }

    /// Remove last character from filter
    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        if self.filter.is_empty() {
            self.filtering = false;
        }
        self.update_filtered();
    }

    /// Update filtered list based on current filter
    fn update_filtered(&mut self) {
        if self.filter.is_empty() {
            self.filtered = (0..self.pool.len()).collect();
        } else {
            let pattern = Pattern::parse(&self.filter, CaseMatching::Ignore, Normalization::Smart);

            let mut scored: Vec<(usize, u32)> = self
                .pool
                .iter()
                .enumerate()
                .filter_map(|(i, entry)| {
                    let mut buf = Vec::new();
                    pattern
                        .score(nucleo_matcher::Utf32Str::new(entry.name(), &mut buf), &mut self.matcher)
                        .map(|score| (i, score))
                })
                .collect();

            // Sort by score descending, ties keep wheel order
            scored.sort_by(|a, b| b.1.cmp(&a.1));
            self.filtered = scored.into_iter().map(|(i, _)| i).collect();
        }

        // Reset selection if out of bounds
        if self.selected >= self.filtered.len() {
            self.selected = 0;
        }
    }

    /// Get current application mode
    pub fn mode(&self) -> &AppMode {
        &self.mode
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.mode, AppMode::Spinning { .. })
    }

    /// Entry under the pointer right now, with the wheel it belongs to
    pub fn spin_frame(&self, now: Instant) -> Option<(&[Entry], usize, f64)> {
        match &self.mode {
            AppMode::Spinning {
                spin,
                started,
                wheel,
                ..
            } => {
                let elapsed: Duration = now.saturating_duration_since(*started);
                Some((wheel.as_slice(), spin.index_at(elapsed), spin.progress(elapsed)))
            }
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    /// Show an error in the status bar instead of failing the UI loop
    pub fn report_error(&mut self, err: impl std::fmt::Display) {
        let text = err.to_string();
        tracing::warn!("{}", text);
        self.status = Some(StatusMessage {
            text,
            kind: StatusKind::Error,
        });
    }

    /// Get config reference
    pub fn config(&self) -> &Config {
        &self.config
    }
}
