//! The auth orchestrator: composes the credential verifier, the token
//! codec, and the session lifecycle manager into the five operations the
//! HTTP layer consumes (register, login, refresh, logout, logout-all).

use streamgate_core::error::AuthResult;
use streamgate_core::types::DbId;
use streamgate_db::models::session::UserSession;

use crate::jwt::{self, JwtConfig};
use crate::providers::{CredentialVerifier, Identity, NewUser, SessionCache, SessionStore};
use crate::session::SessionManager;

/// Opaque device descriptors captured at login and frozen into the session.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Browser fingerprint, mobile device id, or similar.
    pub device_id: String,
    /// Human-readable label, e.g. "Chrome on Windows" or "iPhone 13".
    pub device_name: String,
    pub ip_address: String,
}

/// Successful authentication result returned by register, login, and
/// refresh.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: &'static str,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub username: String,
    pub roles: std::collections::HashSet<String>,
}

/// Composes credential verification, token issuing, and session lifecycle.
pub struct AuthService<V, S, C> {
    verifier: V,
    sessions: SessionManager<S, C>,
    jwt: JwtConfig,
}

impl<V, S, C> AuthService<V, S, C>
where
    V: CredentialVerifier,
    S: SessionStore,
    C: SessionCache,
{
    pub fn new(verifier: V, sessions: SessionManager<S, C>, jwt: JwtConfig) -> Self {
        Self {
            verifier,
            sessions,
            jwt,
        }
    }

    /// Create a new identity with the default role, then behave exactly
    /// like [`Self::login`].
    pub async fn register(&self, new_user: NewUser, device: DeviceInfo) -> AuthResult<AuthTokens> {
        let identity = self.verifier.register(&new_user).await?;
        self.issue_for(identity, device).await
    }

    /// Authenticate and open a new device session.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device: DeviceInfo,
    ) -> AuthResult<AuthTokens> {
        let identity = self.verifier.verify(username, password).await?;
        self.issue_for(identity, device).await
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// The refresh token itself is returned unchanged (no rotation); its
    /// authority rests with the session, which this call validates and
    /// touches. Roles are re-derived so grants and revocations take effect
    /// at the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<AuthTokens> {
        let claims = jwt::decode_refresh_token(refresh_token, &self.jwt)?;
        let session = self.sessions.validate_session(claims.session_id).await?;

        let roles = self.verifier.role_names_for(session.user_id).await?;
        let identity = Identity {
            user_id: session.user_id,
            username: claims.username,
            roles,
        };
        let access_token = jwt::issue_access_token(&identity, &self.jwt)?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer",
            refresh_token: refresh_token.to_string(),
            expires_in: self.jwt.access_expiry_secs(),
            username: identity.username,
            roles: identity.roles,
        })
    }

    /// Revoke the session named by a refresh token (single-device logout).
    ///
    /// The access token issued alongside it stays usable until its own
    /// short expiry; access tokens carry no session binding.
    pub async fn logout(&self, refresh_token: &str) -> AuthResult<()> {
        let session_id = jwt::extract_session_id(refresh_token, &self.jwt)?;
        self.sessions.revoke_session(session_id).await
    }

    /// Revoke every session of a user (logout from all devices). Returns
    /// the number of sessions revoked.
    pub async fn logout_all(&self, user_id: DbId) -> AuthResult<u64> {
        self.sessions.revoke_all_sessions(user_id).await
    }

    /// Active sessions for the device-management UI.
    pub async fn active_sessions(&self, user_id: DbId) -> AuthResult<Vec<UserSession>> {
        self.sessions.list_active_sessions(user_id).await
    }

    /// Create a session and mint the token pair for an authenticated
    /// identity.
    async fn issue_for(&self, identity: Identity, device: DeviceInfo) -> AuthResult<AuthTokens> {
        let session = self
            .sessions
            .create_session(
                identity.user_id,
                &device.device_id,
                &device.device_name,
                &device.ip_address,
            )
            .await?;

        let access_token = jwt::issue_access_token(&identity, &self.jwt)?;
        let refresh_token =
            jwt::issue_refresh_token(&identity, session.session_id, &device.device_id, &self.jwt)?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer",
            refresh_token,
            expires_in: self.jwt.access_expiry_secs(),
            username: identity.username,
            roles: identity.roles,
        })
    }
}
