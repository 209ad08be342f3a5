//! User session model and DTOs.
//!
//! The session row is the source of truth for refresh-token authority:
//! a refresh token is usable only while the session it names is valid.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use streamgate_core::types::{DbId, SessionId, Timestamp};

/// Session lifecycle status. Transitions are monotonic: a session goes from
/// `Active` to `Revoked` exactly once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Revoked,
}

/// A session row from the `user_sessions` table.
///
/// One row per authenticated device login. Rows are never physically
/// deleted; revoked rows remain as an audit trail.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserSession {
    pub session_id: SessionId,
    pub user_id: DbId,
    pub device_id: String,
    pub device_name: String,
    pub ip_address: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    /// Bumped on every successful validation; the LRU signal for eviction.
    pub last_used_at: Timestamp,
    pub expires_at: Timestamp,
}

impl UserSession {
    /// A session is valid iff it is still active and not past its expiry.
    ///
    /// Validity is re-derived on every check; it is never stored.
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        self.status == SessionStatus::Active && now < self.expires_at
    }
}

/// DTO for creating a new session. The `session_id`, `status`, and
/// timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub device_id: String,
    pub device_name: String,
    pub ip_address: String,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(status: SessionStatus, expires_in: Duration) -> UserSession {
        let now = Utc::now();
        UserSession {
            session_id: uuid::Uuid::new_v4(),
            user_id: 1,
            device_id: "dev-1".into(),
            device_name: "Chrome on Linux".into(),
            ip_address: "127.0.0.1".into(),
            status,
            created_at: now,
            last_used_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn active_unexpired_session_is_valid() {
        let s = session(SessionStatus::Active, Duration::hours(1));
        assert!(s.is_valid_at(Utc::now()));
    }

    #[test]
    fn revoked_session_is_invalid_even_before_expiry() {
        let s = session(SessionStatus::Revoked, Duration::hours(1));
        assert!(!s.is_valid_at(Utc::now()));
    }

    #[test]
    fn expired_session_is_invalid_even_while_active() {
        let s = session(SessionStatus::Active, Duration::seconds(-1));
        assert!(!s.is_valid_at(Utc::now()));
    }
}
