//! JWT issuing and parsing for access and refresh tokens.
//!
//! Both token kinds are HS256-signed JWTs sharing one secret. Access tokens
//! carry identity + roles and nothing else; they are not revocable before
//! their (short) expiry. Refresh tokens additionally embed the `session_id`
//! and `device_id` claims, delegating their authority to the session row.

use std::collections::HashSet;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use streamgate_core::error::{AuthError, AuthResult};
use streamgate_core::types::{DbId, SessionId};
use uuid::Uuid;

use crate::providers::Identity;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    /// Role names, order-insensitive.
    pub roles: HashSet<String>,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token identifier (UUID v4) for audit trails; also keeps two
    /// tokens minted within the same second distinct.
    pub jti: String,
}

/// Claims embedded in every refresh token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub username: String,
    /// The session this token's authority is delegated to.
    pub session_id: SessionId,
    pub device_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Refresh token (= session) lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }

    /// Access token lifetime in seconds, as reported to clients.
    pub fn access_expiry_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Issue an HS256 access token for the given identity.
pub fn issue_access_token(identity: &Identity, config: &JwtConfig) -> AuthResult<String> {
    let now = chrono::Utc::now().timestamp();

    let claims = AccessClaims {
        sub: identity.user_id,
        username: identity.username.clone(),
        roles: identity.roles.clone(),
        iat: now,
        exp: now + config.access_expiry_secs(),
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Access token signing failed: {e}")))
}

/// Issue an HS256 refresh token bound to the given session.
pub fn issue_refresh_token(
    identity: &Identity,
    session_id: SessionId,
    device_id: &str,
    config: &JwtConfig,
) -> AuthResult<String> {
    let now = chrono::Utc::now().timestamp();

    let claims = RefreshClaims {
        sub: identity.user_id,
        username: identity.username.clone(),
        session_id,
        device_id: device_id.to_string(),
        iat: now,
        exp: now + config.refresh_token_expiry_days * 86_400,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("Refresh token signing failed: {e}")))
}

/// Validate and decode an access token.
pub fn decode_access_token(token: &str, config: &JwtConfig) -> AuthResult<AccessClaims> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)
}

/// Validate and decode a refresh token.
///
/// Fails with `TokenMalformed` if the `session_id` claim is absent, e.g.
/// when an access token is passed where a refresh token is expected.
pub fn decode_refresh_token(token: &str, config: &JwtConfig) -> AuthResult<RefreshClaims> {
    decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(map_jwt_error)
}

/// Extract the session id a refresh token delegates its authority to.
pub fn extract_session_id(token: &str, config: &JwtConfig) -> AuthResult<SessionId> {
    decode_refresh_token(token, config).map(|claims| claims.session_id)
}

/// Map `jsonwebtoken` failures onto the auth error taxonomy.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::Json(_) | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
            AuthError::TokenMalformed(err.to_string())
        }
        _ => AuthError::TokenInvalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Helper to build a test config with a known secret.
    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn alice() -> Identity {
        Identity {
            user_id: 42,
            username: "alice".to_string(),
            roles: ["user", "streamer"].iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn access_token_round_trip() {
        let config = test_config();
        let token = issue_access_token(&alice(), &config).expect("issuing should succeed");

        let claims = decode_access_token(&token, &config).expect("decoding should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.username, "alice");
        assert!(claims.roles.contains("streamer"));
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn refresh_token_round_trip() {
        let config = test_config();
        let session_id = Uuid::new_v4();
        let token = issue_refresh_token(&alice(), session_id, "dev-1", &config)
            .expect("issuing should succeed");

        let claims = decode_refresh_token(&token, &config).expect("decoding should succeed");
        assert_eq!(claims.session_id, session_id);
        assert_eq!(claims.device_id, "dev-1");

        let extracted = extract_session_id(&token, &config).expect("extraction should succeed");
        assert_eq!(extracted, session_id);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Manually create an already-expired token, with a margin well
        // beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            username: "alice".to_string(),
            roles: HashSet::new(),
            iat: now - 600,
            exp: now - 300,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert_matches!(
            decode_access_token(&token, &config),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn wrong_secret_fails_as_invalid() {
        let config_a = test_config();
        let mut config_b = test_config();
        config_b.secret = "a-completely-different-secret".to_string();

        let token = issue_access_token(&alice(), &config_a).expect("issuing should succeed");
        assert_matches!(
            decode_access_token(&token, &config_b),
            Err(AuthError::TokenInvalid)
        );
    }

    #[test]
    fn access_token_where_refresh_expected_is_malformed() {
        let config = test_config();
        let token = issue_access_token(&alice(), &config).expect("issuing should succeed");

        // Access tokens carry no session_id claim.
        assert_matches!(
            extract_session_id(&token, &config),
            Err(AuthError::TokenMalformed(_))
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(decode_access_token("not-a-jwt-at-all", &config).is_err());
    }
}
