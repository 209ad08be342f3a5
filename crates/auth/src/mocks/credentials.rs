//! In-memory credential verifier.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use streamgate_core::error::{AuthError, AuthResult};
use streamgate_core::roles::ROLE_USER;
use streamgate_core::types::DbId;

use crate::providers::{CredentialVerifier, Identity, NewUser};

struct MockUser {
    user_id: DbId,
    email: String,
    /// Plaintext comparison; the mock skips real hashing.
    password: String,
    roles: HashSet<String>,
}

#[derive(Default)]
struct State {
    users: HashMap<String, MockUser>,
    next_id: DbId,
}

/// HashMap-backed credential verifier keyed by username.
#[derive(Clone, Default)]
pub struct MockCredentialVerifier {
    state: Arc<Mutex<State>>,
}

impl MockCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user with explicit roles, returning its id.
    pub fn add_user(&self, username: &str, password: &str, roles: &[&str]) -> DbId {
        let mut state = self.state.lock().expect("mock lock");
        state.next_id += 1;
        let user_id = state.next_id;
        state.users.insert(
            username.to_string(),
            MockUser {
                user_id,
                email: format!("{username}@example.com"),
                password: password.to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
        user_id
    }

    /// Replace a user's role set, for exercising role re-derivation on
    /// refresh.
    pub fn set_roles(&self, username: &str, roles: &[&str]) {
        let mut state = self.state.lock().expect("mock lock");
        if let Some(user) = state.users.get_mut(username) {
            user.roles = roles.iter().map(|r| r.to_string()).collect();
        }
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> AuthResult<Identity> {
        let state = self.state.lock().expect("mock lock");
        match state.users.get(username) {
            Some(user) if user.password == password => Ok(Identity {
                user_id: user.user_id,
                username: username.to_string(),
                roles: user.roles.clone(),
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }

    async fn register(&self, new_user: &NewUser) -> AuthResult<Identity> {
        let mut state = self.state.lock().expect("mock lock");
        if state.users.contains_key(&new_user.username) {
            return Err(AuthError::UsernameTaken);
        }
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AuthError::EmailTaken);
        }

        state.next_id += 1;
        let user_id = state.next_id;
        let roles = HashSet::from([ROLE_USER.to_string()]);
        state.users.insert(
            new_user.username.clone(),
            MockUser {
                user_id,
                email: new_user.email.clone(),
                password: new_user.password.clone(),
                roles: roles.clone(),
            },
        );

        Ok(Identity {
            user_id,
            username: new_user.username.clone(),
            roles,
        })
    }

    async fn role_names_for(&self, user_id: DbId) -> AuthResult<HashSet<String>> {
        let state = self.state.lock().expect("mock lock");
        state
            .users
            .values()
            .find(|u| u.user_id == user_id)
            .map(|u| u.roles.clone())
            .ok_or(AuthError::InvalidCredentials)
    }
}
