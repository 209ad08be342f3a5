//! In-memory session cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use streamgate_core::error::AuthResult;
use streamgate_core::types::SessionId;
use streamgate_db::models::session::UserSession;

use crate::providers::{CachedSession, SessionCache};

/// HashMap-backed cache with the same TTL behavior as Redis: entries whose
/// session expiry has passed read back as misses.
#[derive(Clone, Default)]
pub struct InMemorySessionCache {
    entries: Arc<Mutex<HashMap<SessionId, CachedSession>>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an entry is currently cached, for test assertions.
    pub fn contains(&self, session_id: SessionId) -> bool {
        self.entries
            .lock()
            .expect("mock lock")
            .contains_key(&session_id)
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn put(&self, session: &UserSession) -> AuthResult<()> {
        if session.expires_at <= Utc::now() {
            // Never cache an already-expired session.
            return Ok(());
        }
        self.entries
            .lock()
            .expect("mock lock")
            .insert(session.session_id, CachedSession::from(session));
        Ok(())
    }

    async fn get(&self, session_id: SessionId) -> AuthResult<Option<CachedSession>> {
        let mut entries = self.entries.lock().expect("mock lock");
        match entries.get(&session_id) {
            Some(entry) if entry.expires_at <= Utc::now() => {
                // TTL elapsed; evict like Redis would.
                entries.remove(&session_id);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.clone())),
            None => Ok(None),
        }
    }

    async fn invalidate(&self, session_id: SessionId) -> AuthResult<()> {
        self.entries.lock().expect("mock lock").remove(&session_id);
        Ok(())
    }
}
