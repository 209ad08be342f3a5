//! User account model and DTOs.

use sqlx::FromRow;
use streamgate_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    /// Argon2id PHC-formatted hash. Never leaves the persistence layer.
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. The password is hashed before this point.
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
