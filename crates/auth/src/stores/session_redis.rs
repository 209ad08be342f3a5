//! Redis-backed session cache.
//!
//! Values are JSON-serialized [`CachedSession`] projections under a
//! versioned key namespace, with per-key TTL equal to the time remaining
//! until the session expires. Bulk invalidation by user is deliberately not
//! implemented: a pattern scan is expensive, and revoke-all correctness
//! comes from the store, not the cache.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use streamgate_core::error::{AuthError, AuthResult};
use streamgate_core::types::SessionId;
use streamgate_db::models::session::UserSession;

use crate::providers::{CachedSession, SessionCache};

/// Bumped whenever the serialized shape of [`CachedSession`] changes, so
/// old entries read back as misses instead of decode errors.
const CACHE_VERSION: &str = "v1";

/// Session cache over Redis with TTL-bound entries.
#[derive(Clone)]
pub struct RedisSessionCache {
    conn: ConnectionManager,
}

impl RedisSessionCache {
    /// Connect to Redis and build a pooled connection manager.
    pub async fn connect(redis_url: &str) -> AuthResult<Self> {
        let client = Client::open(redis_url).map_err(AuthError::cache)?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(AuthError::cache)?;
        Ok(Self { conn })
    }

    fn key(session_id: SessionId) -> String {
        format!("session:{CACHE_VERSION}:{session_id}")
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn put(&self, session: &UserSession) -> AuthResult<()> {
        let ttl_secs = (session.expires_at - chrono::Utc::now()).num_seconds();
        if ttl_secs <= 0 {
            // Never cache an already-expired session.
            return Ok(());
        }

        let projection = CachedSession::from(session);
        let payload = serde_json::to_string(&projection).map_err(AuthError::cache)?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::key(session.session_id), payload, ttl_secs as u64)
            .await
            .map_err(AuthError::cache)?;
        Ok(())
    }

    async fn get(&self, session_id: SessionId) -> AuthResult<Option<CachedSession>> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn
            .get(Self::key(session_id))
            .await
            .map_err(AuthError::cache)?;

        match payload {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(AuthError::cache),
            None => Ok(None),
        }
    }

    async fn invalidate(&self, session_id: SessionId) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(Self::key(session_id))
            .await
            .map_err(AuthError::cache)?;
        Ok(())
    }
}

/// A cache that never hits. Used when the cache tier is disabled; every
/// validation falls through to the store, which changes latency but not
/// results.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSessionCache;

#[async_trait]
impl SessionCache for NoopSessionCache {
    async fn put(&self, _session: &UserSession) -> AuthResult<()> {
        Ok(())
    }

    async fn get(&self, _session_id: SessionId) -> AuthResult<Option<CachedSession>> {
        Ok(None)
    }

    async fn invalidate(&self, _session_id: SessionId) -> AuthResult<()> {
        Ok(())
    }
}
