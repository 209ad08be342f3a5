//! In-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use streamgate_core::error::AuthResult;
use streamgate_core::types::{DbId, SessionId, Timestamp};
use streamgate_db::models::session::{CreateSession, SessionStatus, UserSession};
use uuid::Uuid;

use crate::providers::SessionStore;

/// HashMap-backed session store mirroring the Postgres semantics, including
/// the deterministic LRU ordering of `oldest_active`.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    rows: Arc<Mutex<HashMap<SessionId, UserSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw row, bypassing `create`. Lets tests control timestamps
    /// and status directly.
    pub fn insert(&self, session: UserSession) {
        self.rows
            .lock()
            .expect("mock lock")
            .insert(session.session_id, session);
    }

    /// Read a raw row for assertions.
    pub fn get(&self, session_id: SessionId) -> Option<UserSession> {
        self.rows.lock().expect("mock lock").get(&session_id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, input: &CreateSession) -> AuthResult<UserSession> {
        let now = Utc::now();
        let session = UserSession {
            session_id: Uuid::new_v4(),
            user_id: input.user_id,
            device_id: input.device_id.clone(),
            device_name: input.device_name.clone(),
            ip_address: input.ip_address.clone(),
            status: SessionStatus::Active,
            created_at: now,
            last_used_at: now,
            expires_at: input.expires_at,
        };
        self.insert(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<UserSession>> {
        Ok(self.get(session_id))
    }

    async fn list_active(&self, user_id: DbId) -> AuthResult<Vec<UserSession>> {
        let rows = self.rows.lock().expect("mock lock");
        let mut active: Vec<UserSession> = rows
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.last_used_at.cmp(&a.last_used_at));
        Ok(active)
    }

    async fn count_active(&self, user_id: DbId) -> AuthResult<i64> {
        let rows = self.rows.lock().expect("mock lock");
        Ok(rows
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::Active)
            .count() as i64)
    }

    async fn oldest_active(&self, user_id: DbId) -> AuthResult<Option<UserSession>> {
        let rows = self.rows.lock().expect("mock lock");
        Ok(rows
            .values()
            .filter(|s| s.user_id == user_id && s.status == SessionStatus::Active)
            .min_by_key(|s| (s.last_used_at, s.session_id))
            .cloned())
    }

    async fn touch(
        &self,
        session_id: SessionId,
        now: Timestamp,
    ) -> AuthResult<Option<UserSession>> {
        let mut rows = self.rows.lock().expect("mock lock");
        Ok(rows.get_mut(&session_id).map(|s| {
            s.last_used_at = now;
            s.clone()
        }))
    }

    async fn set_status(&self, session_id: SessionId, status: SessionStatus) -> AuthResult<bool> {
        let mut rows = self.rows.lock().expect("mock lock");
        match rows.get_mut(&session_id) {
            Some(s) if s.status != status => {
                s.status = status;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status_for_user(&self, user_id: DbId, status: SessionStatus) -> AuthResult<u64> {
        let mut rows = self.rows.lock().expect("mock lock");
        let mut changed = 0;
        for s in rows.values_mut() {
            if s.user_id == user_id && s.status != status {
                s.status = status;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn find_expired_active(&self, now: Timestamp) -> AuthResult<Vec<UserSession>> {
        let rows = self.rows.lock().expect("mock lock");
        Ok(rows
            .values()
            .filter(|s| s.status == SessionStatus::Active && s.expires_at < now)
            .cloned()
            .collect())
    }
}
