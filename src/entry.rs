//! Participant and draw-record value types.
//!
//! ```text
//! file / --entry args
//!        │
//!        ▼
//!   importer.rs (rows → Entry)
//!        │
//!        ▼
//!   DrawSession (pool of Entry) ──draw──▶ DrawRecord (history)
//! ```
//!
//! An `Entry` can only be built through [`Entry::new`], so every pool the
//! session sees already has a non-empty name and a weight of at least 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::DrawError;

/// One participant: a name and how many "tickets" it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawEntry")]
pub struct Entry {
    name: String,
    weight: u32,
}

/// Unvalidated wire form; deserialized entries go through `Entry::new`
#[derive(Deserialize)]
struct RawEntry {
    name: String,
    weight: u32,
}

impl TryFrom<RawEntry> for Entry {
    type Error = DrawError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        Entry::new(raw.name, raw.weight)
    }
}

impl Entry {
    /// Build a validated entry. The name is trimmed.
    pub fn new(name: impl AsRef<str>, weight: u32) -> Result<Self, DrawError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DrawError::EmptyName);
        }
        if weight == 0 {
            return Err(DrawError::invalid_weight(name));
        }
        Ok(Self {
            name: name.to_string(),
            weight,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Key used for case-insensitive uniqueness
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x)", self.name, self.weight)
    }
}

/// A winner, frozen at the moment it was drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub name: String,
    /// Weight the entry had when it was drawn
    pub weight: u32,
    pub drawn_at: DateTime<Utc>,
}

impl DrawRecord {
    pub fn new(entry: &Entry, drawn_at: DateTime<Utc>) -> Self {
        Self {
            name: entry.name.clone(),
            weight: entry.weight,
            drawn_at,
        }
    }
}

/// Sum of weights, widened so large pools cannot overflow
pub fn total_weight(pool: &[Entry]) -> u64 {
    pool.iter().map(|e| u64::from(e.weight)).sum()
}

/// First name in `entries` that collides case-insensitively with an earlier one
pub fn find_duplicate(entries: &[Entry]) -> Option<&Entry> {
    let mut seen = HashSet::new();
    entries.iter().find(|e| !seen.insert(e.key()))
}
