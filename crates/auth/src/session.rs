//! Session lifecycle: creation with per-user LRU eviction, cache-first
//! validation, revocation, and the active-session listing.

use chrono::{Duration, Utc};
use streamgate_core::error::{AuthError, AuthResult};
use streamgate_core::types::{DbId, SessionId};
use streamgate_db::models::session::{CreateSession, SessionStatus, UserSession};

use crate::providers::{SessionCache, SessionStore};

/// Default per-user concurrent session limit.
pub const DEFAULT_MAX_SESSIONS_PER_USER: i64 = 5;

/// Orchestrates session state across the durable store and the cache.
///
/// The store is authoritative; the cache only ever short-circuits the
/// *reject* path of a validation. Cache failures are logged and treated as
/// misses, so cache unavailability degrades latency, never correctness.
pub struct SessionManager<S, C> {
    store: S,
    cache: C,
    /// Session (= refresh token) lifetime.
    refresh_lifetime: Duration,
    max_sessions_per_user: i64,
}

impl<S: SessionStore, C: SessionCache> SessionManager<S, C> {
    pub fn new(store: S, cache: C, refresh_lifetime: Duration, max_sessions_per_user: i64) -> Self {
        Self {
            store,
            cache,
            refresh_lifetime,
            max_sessions_per_user,
        }
    }

    /// Create a session for a fresh login, evicting the least recently used
    /// active session if the user is at the limit.
    ///
    /// The limit is advisory: the count and the insert are separate store
    /// round trips, so two concurrent logins near the limit can transiently
    /// exceed it until the next eviction or sweep.
    pub async fn create_session(
        &self,
        user_id: DbId,
        device_id: &str,
        device_name: &str,
        ip_address: &str,
    ) -> AuthResult<UserSession> {
        let active = self.store.count_active(user_id).await?;
        if active >= self.max_sessions_per_user {
            if let Some(oldest) = self.store.oldest_active(user_id).await? {
                tracing::info!(
                    user_id,
                    evicted_session = %oldest.session_id,
                    "Session limit reached; evicting least recently used session"
                );
                self.revoke_session(oldest.session_id).await?;
            }
        }

        let input = CreateSession {
            user_id,
            device_id: device_id.to_string(),
            device_name: device_name.to_string(),
            ip_address: ip_address.to_string(),
            expires_at: Utc::now() + self.refresh_lifetime,
        };
        let session = self.store.create(&input).await?;

        self.cache_put(&session).await;

        tracing::info!(
            user_id,
            session_id = %session.session_id,
            device_name = %session.device_name,
            "Created session"
        );
        Ok(session)
    }

    /// Validate a session named by a refresh token.
    ///
    /// Cache-first: an invalid cached projection rejects without a store
    /// round trip (and drops the cache entry). Any accept is re-derived
    /// from the canonical store row, which also bumps `last_used_at` and
    /// refreshes the cache.
    pub async fn validate_session(&self, session_id: SessionId) -> AuthResult<UserSession> {
        let now = Utc::now();

        match self.cache.get(session_id).await {
            Ok(Some(projection)) => {
                if !projection.is_valid_at(now) {
                    self.cache_invalidate(session_id).await;
                    return Err(AuthError::SessionInvalid);
                }
                // Valid in cache: still confirm against the store below.
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Session cache read failed; falling back to store");
            }
        }

        let session = self
            .store
            .find_by_id(session_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !session.is_valid_at(now) {
            self.cache_invalidate(session_id).await;
            return Err(AuthError::SessionInvalid);
        }

        let session = self
            .store
            .touch(session_id, now)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        self.cache_put(&session).await;
        Ok(session)
    }

    /// Revoke a single session (single-device logout). Idempotent.
    pub async fn revoke_session(&self, session_id: SessionId) -> AuthResult<()> {
        self.store
            .set_status(session_id, SessionStatus::Revoked)
            .await?;
        self.cache_invalidate(session_id).await;
        tracing::info!(session_id = %session_id, "Revoked session");
        Ok(())
    }

    /// Revoke every session of a user (logout from all devices). Returns
    /// the number of sessions that changed state.
    ///
    /// Cache entries are not swept: each one either expires on its own TTL
    /// or is rejected at the next validation, which re-reads the store.
    pub async fn revoke_all_sessions(&self, user_id: DbId) -> AuthResult<u64> {
        let revoked = self
            .store
            .set_status_for_user(user_id, SessionStatus::Revoked)
            .await?;
        tracing::info!(user_id, revoked, "Revoked all sessions for user");
        Ok(revoked)
    }

    /// Active sessions for a user, for device-management UIs. No side
    /// effects.
    pub async fn list_active_sessions(&self, user_id: DbId) -> AuthResult<Vec<UserSession>> {
        self.store.list_active(user_id).await
    }

    /// Write-through that never fails the surrounding operation.
    async fn cache_put(&self, session: &UserSession) {
        if let Err(e) = self.cache.put(session).await {
            tracing::warn!(session_id = %session.session_id, error = %e, "Session cache write failed");
        }
    }

    /// Invalidate that never fails the surrounding operation.
    async fn cache_invalidate(&self, session_id: SessionId) {
        if let Err(e) = self.cache.invalidate(session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Session cache invalidation failed");
        }
    }
}
