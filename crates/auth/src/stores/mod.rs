//! Production implementations of the provider seams.
//!
//! - [`postgres`] -- session store and credential verifier over sqlx/Postgres.
//! - [`session_redis`] -- session cache over Redis.

pub mod postgres;
pub mod session_redis;

pub use postgres::{PgCredentialVerifier, PgSessionStore};
pub use session_redis::{NoopSessionCache, RedisSessionCache};
