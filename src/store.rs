//! In-memory store of draw sessions keyed by opaque id.
//!
//! The map sits behind an `RwLock`; each session has its own `Mutex`, so
//! draws on one session never block another and two draws on the same
//! session cannot interleave.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::entry::{DrawRecord, Entry};
use crate::error::DrawError;
use crate::selector::WeightedSelector;
use crate::session::{DrawSession, SessionSnapshot};

pub type SharedSession = Arc<Mutex<DrawSession>>;

/// Owns every live session; passed by reference to whoever needs it
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `entries` and start a new session with fresh entropy
    pub fn create(&self, entries: Vec<Entry>) -> Result<Uuid, DrawError> {
        let session = DrawSession::create(entries)?;
        Ok(self.insert(session))
    }

    /// Register an already built session (e.g. one with a seeded selector)
    pub fn insert(&self, session: DrawSession) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::debug!(%id, "Session stored");
        id
    }

    /// Handle to a session; lock it to read or mutate
    pub fn get(&self, id: Uuid) -> Result<SharedSession, DrawError> {
        self.sessions
            .read()
            .get(&id)
            .cloned()
            .ok_or(DrawError::SessionNotFound { id })
    }

    /// Run `f` with the session locked
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut DrawSession) -> T,
    ) -> Result<T, DrawError> {
        let session = self.get(id)?;
        let mut guard = session.lock();
        Ok(f(&mut guard))
    }

    pub fn draw(&self, id: Uuid) -> Result<DrawRecord, DrawError> {
        self.with_session(id, |s| s.draw())?
    }

    pub fn reset(&self, id: Uuid) -> Result<(), DrawError> {
        self.with_session(id, |s| s.reset())
    }

    pub fn export_history(&self, id: Uuid) -> Result<Vec<DrawRecord>, DrawError> {
        self.with_session(id, |s| s.export_history())
    }

    pub fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, DrawError> {
        self.with_session(id, |s| s.snapshot(id))
    }

    /// Bring a snapshot back under its own id
    #[allow(dead_code)] // Used in tests
    pub fn restore(&self, snapshot: SessionSnapshot) -> Result<Uuid, DrawError> {
        let id = snapshot.id;
        let session = DrawSession::restore(snapshot, WeightedSelector::from_entropy())?;
        self.sessions
            .write()
            .insert(id, Arc::new(Mutex::new(session)));
        Ok(id)
    }

    /// Drop a session. Unknown ids are ignored.
    pub fn delete(&self, id: Uuid) {
        if self.sessions.write().remove(&id).is_some() {
            tracing::debug!(%id, "Session deleted");
        }
    }
}
