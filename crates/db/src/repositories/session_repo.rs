//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use streamgate_core::types::{DbId, SessionId, Timestamp};

use crate::models::session::{CreateSession, SessionStatus, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "session_id, user_id, device_id, device_name, ip_address, \
                        status, created_at, last_used_at, expires_at";

/// Provides CRUD and status-transition operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the canonical row with the
    /// store-assigned `session_id` and timestamps.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, device_id, device_name, ip_address, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.device_id)
            .bind(&input.device_name)
            .bind(&input.ip_address)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        session_id: SessionId,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE session_id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }

    /// List all active sessions for a user, most recently used first.
    pub async fn list_active(pool: &PgPool, user_id: DbId) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND status = 'active'
             ORDER BY last_used_at DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Count active sessions for a user.
    pub async fn count_active(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_sessions WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Find the least recently used active session for a user.
    ///
    /// Ties on `last_used_at` break by ascending `session_id` so eviction is
    /// deterministic.
    pub async fn oldest_active(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = $1 AND status = 'active'
             ORDER BY last_used_at ASC, session_id ASC
             LIMIT 1"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Bump `last_used_at` on a session, returning the updated row.
    ///
    /// Returns `None` if no row with the given ID exists.
    pub async fn touch(
        pool: &PgPool,
        session_id: SessionId,
        now: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET last_used_at = $2
             WHERE session_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(session_id)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Set the status of a single session. Idempotent: re-applying the same
    /// status is a no-op. Returns `true` if a row changed.
    pub async fn set_status(
        pool: &PgPool,
        session_id: SessionId,
        status: SessionStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET status = $2 WHERE session_id = $1 AND status <> $2",
        )
        .bind(session_id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the status of every session owned by a user. Returns the count of
    /// rows changed.
    pub async fn set_status_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: SessionStatus,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE user_sessions SET status = $2 WHERE user_id = $1 AND status <> $2")
                .bind(user_id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Find sessions whose expiry has passed but whose status is still
    /// active. Used by the cleanup sweeper.
    pub async fn find_expired_active(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE status = 'active' AND expires_at < $1"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
