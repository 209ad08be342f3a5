//! Periodic cleanup of expired sessions.
//!
//! Spawns a background loop that revokes sessions whose expiry has passed
//! but whose status is still active, and drops their cache entries. Runs on
//! a fixed interval using `tokio::time::interval`.
//!
//! This is a reconciliation pass, not a correctness requirement: validation
//! re-derives validity from `expires_at` on every call, so an un-swept
//! expired row is never treated as valid. The sweep bounds what the
//! active-session listing returns and keeps cache growth in check.

use std::time::Duration;

use chrono::Utc;
use streamgate_core::error::AuthResult;
use streamgate_core::types::Timestamp;
use streamgate_db::models::session::SessionStatus;
use tokio_util::sync::CancellationToken;

use crate::providers::{SessionCache, SessionStore};

/// How often the cleanup job runs by default: 30 minutes.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1800);

/// Run the session cleanup loop until `cancel` is triggered.
pub async fn run<S, C>(store: S, cache: C, interval: Duration, cancel: CancellationToken)
where
    S: SessionStore,
    C: SessionCache,
{
    tracing::info!(interval_secs = interval.as_secs(), "Session cleanup job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweep_once(&store, &cache, Utc::now()).await {
                    Ok(swept) if swept > 0 => {
                        tracing::info!(swept, "Session cleanup: revoked expired sessions");
                    }
                    Ok(_) => {
                        tracing::debug!("Session cleanup: no expired sessions");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session cleanup: sweep failed");
                    }
                }
            }
        }
    }
}

/// One reconciliation pass: revoke every expired-but-active session as of
/// `now` and invalidate its cache entry. Returns the number of sessions
/// revoked.
pub async fn sweep_once<S, C>(store: &S, cache: &C, now: Timestamp) -> AuthResult<u64>
where
    S: SessionStore,
    C: SessionCache,
{
    let expired = store.find_expired_active(now).await?;

    let mut swept = 0;
    for session in expired {
        if store
            .set_status(session.session_id, SessionStatus::Revoked)
            .await?
        {
            swept += 1;
        }
        if let Err(e) = cache.invalidate(session.session_id).await {
            tracing::warn!(
                session_id = %session.session_id,
                error = %e,
                "Session cleanup: cache invalidation failed"
            );
        }
    }
    Ok(swept)
}
