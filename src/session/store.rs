use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::Session;

/// In-memory session store.
///
/// Sessions for different users are fully independent, so the outer map is a
/// plain read/write lock. Each session sits behind its own async mutex: every
/// operation that reads-then-appends the answer list holds that mutex for its
/// whole duration, including the AI evaluation await, which is what prevents
/// two submissions from landing on the same question index.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) -> Arc<Mutex<Session>> {
        let id = session.id.clone();
        let entry = Arc::new(Mutex::new(session));
        self.sessions.write().insert(id, Arc::clone(&entry));
        entry
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.read().get(session_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// All session handles at this instant. The outer lock is released before
    /// callers await on any per-session mutex.
    pub fn entries(&self) -> Vec<Arc<Mutex<Session>>> {
        self.sessions.read().values().cloned().collect()
    }

    /// Cloned snapshots of every session, taken one session lock at a time.
    pub async fn snapshots(&self) -> Vec<Session> {
        let entries = self.entries();
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(entry.lock().await.clone());
        }
        out
    }
}
