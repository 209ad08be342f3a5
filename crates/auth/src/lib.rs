//! Session-backed token authentication for the streamgate platform.
//!
//! Access tokens are short-lived stateless JWTs. Refresh tokens are JWTs
//! bound to a durable session row: they stay cryptographically valid until
//! their own expiry, but are only usable while the session they name is
//! active, which is what makes immediate multi-device revocation possible.
//!
//! - [`jwt`] -- token issuing and parsing (the token codec).
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`providers`] -- trait seams for the session store, session cache, and
//!   credential verifier.
//! - [`stores`] -- Postgres and Redis implementations of the seams.
//! - [`session`] -- session lifecycle: creation with LRU eviction,
//!   cache-first validation, revocation.
//! - [`service`] -- the auth orchestrator (register/login/refresh/logout).
//! - [`background`] -- the expired-session cleanup sweeper.

pub mod background;
pub mod config;
pub mod jwt;
pub mod password;
pub mod providers;
pub mod service;
pub mod session;
pub mod stores;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use providers::{CachedSession, CredentialVerifier, Identity, NewUser, SessionCache, SessionStore};
pub use service::{AuthService, AuthTokens, DeviceInfo};
pub use session::SessionManager;
