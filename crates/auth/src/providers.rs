//! Trait seams the auth core depends on.
//!
//! Production wires [`crate::stores`] implementations (Postgres, Redis)
//! into these traits; tests wire the in-memory [`crate::mocks`].

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use streamgate_core::error::AuthResult;
use streamgate_core::types::{DbId, SessionId, Timestamp};
use streamgate_db::models::session::{CreateSession, SessionStatus, UserSession};

/// An authenticated identity with its role names.
///
/// Always passed explicitly through the call chain; there is no ambient
/// "current user".
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: DbId,
    pub username: String,
    /// Role names as an order-insensitive set.
    pub roles: HashSet<String>,
}

/// Registration input. The password is plaintext here and hashed by the
/// credential verifier before anything is persisted.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Verifies credentials and manages identities.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Authenticate a username/password pair.
    ///
    /// Fails with `InvalidCredentials` for an unknown username or a password
    /// mismatch; the two cases are indistinguishable to the caller.
    async fn verify(&self, username: &str, password: &str) -> AuthResult<Identity>;

    /// Create a new identity with the default role.
    ///
    /// Fails with `UsernameTaken` / `EmailTaken` on conflicts.
    async fn register(&self, new_user: &NewUser) -> AuthResult<Identity>;

    /// Resolve the current role names for a user.
    async fn role_names_for(&self, user_id: DbId) -> AuthResult<HashSet<String>>;
}

/// Durable, authoritative session storage.
///
/// The store is the single source of truth for session validity; every
/// mutation is a single-row transaction.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new active session, returning the canonical record with
    /// the store-assigned `session_id`.
    async fn create(&self, input: &CreateSession) -> AuthResult<UserSession>;

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<UserSession>>;

    async fn list_active(&self, user_id: DbId) -> AuthResult<Vec<UserSession>>;

    async fn count_active(&self, user_id: DbId) -> AuthResult<i64>;

    /// The active session with the oldest `last_used_at`; ties break by
    /// ascending `session_id` for determinism.
    async fn oldest_active(&self, user_id: DbId) -> AuthResult<Option<UserSession>>;

    /// Bump `last_used_at`, returning the updated row if it exists.
    async fn touch(&self, session_id: SessionId, now: Timestamp) -> AuthResult<Option<UserSession>>;

    /// Idempotent status transition for one session. Returns `true` if a
    /// row changed.
    async fn set_status(&self, session_id: SessionId, status: SessionStatus) -> AuthResult<bool>;

    /// Idempotent bulk status transition for all of a user's sessions.
    /// Returns the count of rows changed.
    async fn set_status_for_user(&self, user_id: DbId, status: SessionStatus) -> AuthResult<u64>;

    /// Sessions whose expiry has passed but whose status is still active.
    async fn find_expired_active(&self, now: Timestamp) -> AuthResult<Vec<UserSession>>;
}

/// A TTL-bound, serializable projection of a session row.
///
/// Derived view only: the session store remains the source of truth, and a
/// cached `last_used_at` may lag the store slightly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSession {
    pub session_id: SessionId,
    pub user_id: DbId,
    pub device_id: String,
    pub device_name: String,
    pub ip_address: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub last_used_at: Timestamp,
    pub expires_at: Timestamp,
}

impl CachedSession {
    /// Same validity rule as the canonical row.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.status == SessionStatus::Active && now < self.expires_at
    }
}

impl From<&UserSession> for CachedSession {
    fn from(session: &UserSession) -> Self {
        CachedSession {
            session_id: session.session_id,
            user_id: session.user_id,
            device_id: session.device_id.clone(),
            device_name: session.device_name.clone(),
            ip_address: session.ip_address.clone(),
            status: session.status,
            created_at: session.created_at,
            last_used_at: session.last_used_at,
            expires_at: session.expires_at,
        }
    }
}

/// Best-effort key/value mirror of session records.
///
/// Callers must treat every error as a cache miss; the cache never gets to
/// fail a request.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Store a projection with TTL = time remaining until the session
    /// expires. A non-positive TTL skips the write entirely.
    async fn put(&self, session: &UserSession) -> AuthResult<()>;

    async fn get(&self, session_id: SessionId) -> AuthResult<Option<CachedSession>>;

    /// Explicit delete, called on every single-session revoke.
    async fn invalidate(&self, session_id: SessionId) -> AuthResult<()>;
}
