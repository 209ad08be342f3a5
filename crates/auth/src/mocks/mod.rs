//! In-memory mock providers for testing.
//!
//! Simple implementations of the provider traits that run at memory speed,
//! used by unit and integration tests in place of Postgres and Redis.

pub mod credentials;
pub mod session_cache;
pub mod session_store;

pub use credentials::MockCredentialVerifier;
pub use session_cache::InMemorySessionCache;
pub use session_store::InMemorySessionStore;
