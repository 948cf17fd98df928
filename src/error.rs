//! Error types for the draw core.
//!
//! Everything here is a local, recoverable condition. The TUI shows these in
//! the status bar; headless mode wraps them with `anyhow` context.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by entries, the selector, sessions and the session store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    /// Creating a session with no entries
    #[error("cannot start a draw with no participants")]
    EmptyInput,

    /// Two entries share a name (case-insensitive)
    #[error("duplicate participant name: '{name}'")]
    DuplicateName { name: String },

    /// Drawing when nothing is left
    #[error("no participants left to draw")]
    EmptyPool,

    /// Pool whose weights sum to zero (unreachable through `Entry::new`)
    #[error("pool has zero total weight")]
    InvalidPool,

    /// Operating before any pool was loaded
    #[error("no active draw session - load participants first")]
    NoActiveSession,

    /// Entry name is blank after trimming
    #[error("participant name must not be empty")]
    EmptyName,

    /// Entry weight below 1
    #[error("participant '{name}' must have a weight of at least 1")]
    InvalidWeight { name: String },

    /// Store lookup with an unknown or deleted id
    #[error("draw session {id} not found")]
    SessionNotFound { id: Uuid },

    /// Snapshot that breaks the pool/history invariants
    #[error("invalid session snapshot: {0}")]
    InvalidSnapshot(String),
}

impl DrawError {
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn invalid_weight(name: impl Into<String>) -> Self {
        Self::InvalidWeight { name: name.into() }
    }

    /// Whether the error means the pool ran dry (the UI offers a reset)
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::EmptyPool)
    }
}
