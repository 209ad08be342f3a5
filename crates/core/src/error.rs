//! Error taxonomy for the authentication subsystem.

/// Domain-level authentication and session errors.
///
/// Infrastructure failures are split by component: `StoreUnavailable` is
/// fatal for the operation that hit it, while `CacheUnavailable` must be
/// treated as a cache miss by callers and never fails a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// Signature verification failed.
    #[error("Token is invalid")]
    TokenInvalid,

    /// The token is garbled or lacks a required claim (e.g. an access token
    /// was passed where a refresh token is expected).
    #[error("Token is malformed: {0}")]
    TokenMalformed(String),

    #[error("Token has expired")]
    TokenExpired,

    /// A refresh token names a session id absent from the store.
    #[error("Session not found")]
    SessionNotFound,

    /// The session exists but is revoked or past its expiry.
    #[error("Session expired or revoked")]
    SessionInvalid,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Session cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Non-retryable internal failure (e.g. signing-key misconfiguration).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Wrap a store client error as `StoreUnavailable`.
    pub fn store(err: impl std::fmt::Display) -> Self {
        AuthError::StoreUnavailable(err.to_string())
    }

    /// Wrap a cache client error as `CacheUnavailable`.
    pub fn cache(err: impl std::fmt::Display) -> Self {
        AuthError::CacheUnavailable(err.to_string())
    }
}

/// Convenience alias used throughout the auth crates.
pub type AuthResult<T> = Result<T, AuthError>;
