//! Postgres-backed session store and credential verifier.
//!
//! Thin adapters that delegate to the `streamgate-db` repositories and map
//! `sqlx::Error` onto the auth error taxonomy.

use std::collections::HashSet;

use async_trait::async_trait;
use streamgate_core::error::{AuthError, AuthResult};
use streamgate_core::roles::ROLE_USER;
use streamgate_core::types::{DbId, SessionId, Timestamp};
use streamgate_db::models::session::{CreateSession, SessionStatus, UserSession};
use streamgate_db::models::user::CreateUser;
use streamgate_db::repositories::{RoleRepo, SessionRepo, UserRepo, UserRoleRepo};
use streamgate_db::DbPool;

use crate::password::{hash_password, verify_password};
use crate::providers::{CredentialVerifier, Identity, NewUser, SessionStore};

/// Authoritative session store over the `user_sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, input: &CreateSession) -> AuthResult<UserSession> {
        SessionRepo::create(&self.pool, input)
            .await
            .map_err(AuthError::store)
    }

    async fn find_by_id(&self, session_id: SessionId) -> AuthResult<Option<UserSession>> {
        SessionRepo::find_by_id(&self.pool, session_id)
            .await
            .map_err(AuthError::store)
    }

    async fn list_active(&self, user_id: DbId) -> AuthResult<Vec<UserSession>> {
        SessionRepo::list_active(&self.pool, user_id)
            .await
            .map_err(AuthError::store)
    }

    async fn count_active(&self, user_id: DbId) -> AuthResult<i64> {
        SessionRepo::count_active(&self.pool, user_id)
            .await
            .map_err(AuthError::store)
    }

    async fn oldest_active(&self, user_id: DbId) -> AuthResult<Option<UserSession>> {
        SessionRepo::oldest_active(&self.pool, user_id)
            .await
            .map_err(AuthError::store)
    }

    async fn touch(
        &self,
        session_id: SessionId,
        now: Timestamp,
    ) -> AuthResult<Option<UserSession>> {
        SessionRepo::touch(&self.pool, session_id, now)
            .await
            .map_err(AuthError::store)
    }

    async fn set_status(&self, session_id: SessionId, status: SessionStatus) -> AuthResult<bool> {
        SessionRepo::set_status(&self.pool, session_id, status)
            .await
            .map_err(AuthError::store)
    }

    async fn set_status_for_user(&self, user_id: DbId, status: SessionStatus) -> AuthResult<u64> {
        SessionRepo::set_status_for_user(&self.pool, user_id, status)
            .await
            .map_err(AuthError::store)
    }

    async fn find_expired_active(&self, now: Timestamp) -> AuthResult<Vec<UserSession>> {
        SessionRepo::find_expired_active(&self.pool, now)
            .await
            .map_err(AuthError::store)
    }
}

/// Credential verifier over the `users` / `roles` / `user_roles` tables.
#[derive(Clone)]
pub struct PgCredentialVerifier {
    pool: DbPool,
}

impl PgCredentialVerifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn roles_as_set(&self, user_id: DbId) -> AuthResult<HashSet<String>> {
        let names = RoleRepo::names_for_user(&self.pool, user_id)
            .await
            .map_err(AuthError::store)?;
        Ok(names.into_iter().collect())
    }
}

#[async_trait]
impl CredentialVerifier for PgCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<Identity> {
        let user = UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(AuthError::store)?
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(format!("Password verification error: {e}")))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.roles_as_set(user.id).await?;
        Ok(Identity {
            user_id: user.id,
            username: user.username,
            roles,
        })
    }

    async fn register(&self, new_user: &NewUser) -> AuthResult<Identity> {
        if UserRepo::exists_by_username(&self.pool, &new_user.username)
            .await
            .map_err(AuthError::store)?
        {
            return Err(AuthError::UsernameTaken);
        }
        if UserRepo::exists_by_email(&self.pool, &new_user.email)
            .await
            .map_err(AuthError::store)?
        {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&new_user.password)
            .map_err(|e| AuthError::Internal(format!("Password hashing error: {e}")))?;

        let input = CreateUser {
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash,
        };
        // The exists checks above race with concurrent registrations; the
        // unique constraints are the real guard.
        let user = UserRepo::create(&self.pool, &input)
            .await
            .map_err(map_user_create_err)?;

        let default_role = RoleRepo::find_by_name(&self.pool, ROLE_USER)
            .await
            .map_err(AuthError::store)?
            .ok_or_else(|| AuthError::Internal("Default role is not seeded".to_string()))?;
        UserRoleRepo::assign(&self.pool, user.id, default_role.id)
            .await
            .map_err(AuthError::store)?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered new user");

        Ok(Identity {
            user_id: user.id,
            username: user.username,
            roles: HashSet::from([ROLE_USER.to_string()]),
        })
    }

    async fn role_names_for(&self, user_id: DbId) -> AuthResult<HashSet<String>> {
        self.roles_as_set(user_id).await
    }
}

/// Classify a unique-constraint violation on user insert into the matching
/// conflict error; everything else is a store failure.
fn map_user_create_err(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            return match db_err.constraint() {
                Some("uq_users_username") => AuthError::UsernameTaken,
                Some("uq_users_email") => AuthError::EmailTaken,
                _ => AuthError::store(err),
            };
        }
    }
    AuthError::store(err)
}
