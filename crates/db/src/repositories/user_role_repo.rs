//! Repository for the `user_roles` join table.

use sqlx::PgPool;
use streamgate_core::types::DbId;

/// Provides grant operations for user-role assignments.
pub struct UserRoleRepo;

impl UserRoleRepo {
    /// Grant a role to a user. Granting an already-held role is a no-op.
    pub async fn assign(pool: &PgPool, user_id: DbId, role_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role_id)
             VALUES ($1, $2)
             ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
