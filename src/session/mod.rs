//! Draw session: the original pool, what is still in the hat, and who won.
//!
//! Invariant kept by every method: the names in `current` plus the names in
//! `history` are exactly the names in `original` (as a multiset), so
//! `current.len() + history.len() == original.len()`.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entry::{find_duplicate, total_weight, DrawRecord, Entry};
use crate::error::DrawError;
use crate::selector::{RandomSource, WeightedSelector};

/// Stateful container for one draw
#[derive(Debug)]
pub struct DrawSession<R = StdRng> {
    original: Vec<Entry>,
    current: Vec<Entry>,
    history: Vec<DrawRecord>,
    created_at: DateTime<Utc>,
    selector: WeightedSelector<R>,
}

/// Typed storage record for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub original: Vec<Entry>,
    pub current: Vec<Entry>,
    pub history: Vec<DrawRecord>,
}

impl DrawSession<StdRng> {
    /// Start a session with a fresh-entropy selector
    pub fn create(entries: Vec<Entry>) -> Result<Self, DrawError> {
        Self::with_selector(entries, WeightedSelector::from_entropy())
    }
}

impl<R: RandomSource> DrawSession<R> {
    /// Start a session drawing through `selector`
    pub fn with_selector(
        entries: Vec<Entry>,
        selector: WeightedSelector<R>,
    ) -> Result<Self, DrawError> {
        validate_pool(&entries)?;

        tracing::info!(
            participants = entries.len(),
            total_weight = total_weight(&entries),
            "Draw session created"
        );

        Ok(Self {
            current: entries.clone(),
            original: entries,
            history: Vec::new(),
            created_at: Utc::now(),
            selector,
        })
    }

    /// Draw one winner and take it out of the pool
    pub fn draw(&mut self) -> Result<DrawRecord, DrawError> {
        self.draw_at(Utc::now())
    }

    /// Draw with an explicit timestamp
    pub fn draw_at(&mut self, now: DateTime<Utc>) -> Result<DrawRecord, DrawError> {
        let idx = self.selector.select_index(&self.current)?;
        let winner = self.current.remove(idx);
        let record = DrawRecord::new(&winner, now);

        tracing::info!(
            winner = %record.name,
            weight = record.weight,
            remaining = self.current.len(),
            "Winner drawn"
        );

        self.history.push(record.clone());
        Ok(record)
    }

    /// Put every entry back and forget the winners
    pub fn reset(&mut self) {
        if !self.history.is_empty() {
            tracing::info!(cleared = self.history.len(), "Draw session reset");
        }
        self.current = self.original.clone();
        self.history.clear();
    }

    /// Copy of the winners so far, in draw order
    pub fn export_history(&self) -> Vec<DrawRecord> {
        self.history.clone()
    }

    /// Entries still eligible to be drawn
    pub fn current_pool(&self) -> &[Entry] {
        &self.current
    }

    /// Entries the session was created with
    pub fn original_pool(&self) -> &[Entry] {
        &self.original
    }

    /// Weight still in the pool
    pub fn total_weight(&self) -> u64 {
        total_weight(&self.current)
    }

    /// Probability that `name` wins the next draw
    pub fn chance_of(&self, name: &str) -> Option<f64> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        self.current
            .iter()
            .find(|e| e.key() == name.to_lowercase())
            .map(|e| f64::from(e.weight()) / total as f64)
    }

    /// Typed record of the session state
    pub fn snapshot(&self, id: Uuid) -> SessionSnapshot {
        SessionSnapshot {
            id,
            created_at: self.created_at,
            original: self.original.clone(),
            current: self.current.clone(),
            history: self.history.clone(),
        }
    }

    /// Rebuild a session from a snapshot, checking the pool invariants
    #[allow(dead_code)] // Used in tests
    pub fn restore(
        snapshot: SessionSnapshot,
        selector: WeightedSelector<R>,
    ) -> Result<Self, DrawError> {
        validate_pool(&snapshot.original)?;
        check_accounting(&snapshot)?;

        Ok(Self {
            original: snapshot.original,
            current: snapshot.current,
            history: snapshot.history,
            created_at: snapshot.created_at,
            selector,
        })
    }
}

fn validate_pool(entries: &[Entry]) -> Result<(), DrawError> {
    if entries.is_empty() {
        return Err(DrawError::EmptyInput);
    }
    if let Some(dup) = find_duplicate(entries) {
        return Err(DrawError::duplicate(dup.name()));
    }
    Ok(())
}

/// Every original entry must be either still in `current` (same name and
/// weight) or recorded in `history` exactly once.
fn check_accounting(snapshot: &SessionSnapshot) -> Result<(), DrawError> {
    let mut expected: HashMap<String, &Entry> =
        snapshot.original.iter().map(|e| (e.key(), e)).collect();

    let seen = snapshot
        .current
        .iter()
        .map(|e| (e.name(), e.weight()))
        .chain(snapshot.history.iter().map(|r| (r.name.as_str(), r.weight)));

    for (name, weight) in seen {
        match expected.remove(&name.to_lowercase()) {
            Some(e) if e.name() != name => {
                return Err(DrawError::InvalidSnapshot(format!(
                    "'{}' does not match '{}' in the original pool",
                    name,
                    e.name()
                )))
            }
            Some(e) if e.weight() != weight => {
                return Err(DrawError::InvalidSnapshot(format!(
                    "weight of '{}' does not match the original pool",
                    name
                )))
            }
            Some(_) => {}
            None => {
                return Err(DrawError::InvalidSnapshot(format!(
                    "'{}' is unknown or accounted for twice",
                    name
                )))
            }
        }
    }

    if let Some(missing) = expected.values().next() {
        return Err(DrawError::InvalidSnapshot(format!(
            "'{}' is neither in the pool nor in the history",
            missing.name()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
