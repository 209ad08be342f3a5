//! End-to-end orchestrator scenarios over the in-memory providers:
//! register -> refresh -> logout, multi-device revocation, and the error
//! paths the HTTP layer maps to status codes.

use assert_matches::assert_matches;
use chrono::Duration;
use streamgate_auth::jwt::JwtConfig;
use streamgate_auth::mocks::{InMemorySessionCache, InMemorySessionStore, MockCredentialVerifier};
use streamgate_auth::{AuthService, DeviceInfo, NewUser, SessionManager};
use streamgate_core::error::AuthError;
use streamgate_core::roles::{ROLE_STREAMER, ROLE_USER};

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-with-plenty-of-entropy".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

fn service(
    verifier: MockCredentialVerifier,
    store: InMemorySessionStore,
    cache: InMemorySessionCache,
) -> AuthService<MockCredentialVerifier, InMemorySessionStore, InMemorySessionCache> {
    let sessions = SessionManager::new(store, cache, Duration::days(7), 5);
    AuthService::new(verifier, sessions, jwt_config())
}

fn device(id: &str) -> DeviceInfo {
    DeviceInfo {
        device_id: id.to_string(),
        device_name: format!("Device {id}"),
        ip_address: "203.0.113.7".to_string(),
    }
}

fn alice() -> NewUser {
    NewUser {
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "hunter2-but-longer".to_string(),
    }
}

#[tokio::test]
async fn register_refresh_logout_lifecycle() {
    let svc = service(
        MockCredentialVerifier::new(),
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    // Register: default role, bearer pair, positive lifetime.
    let tokens = svc.register(alice(), device("laptop")).await.expect("register");
    assert_eq!(tokens.token_type, "Bearer");
    assert_eq!(tokens.username, "alice");
    assert!(tokens.roles.contains(ROLE_USER));
    assert!(tokens.expires_in > 0);

    // Refresh twice: new access token each time, same refresh token.
    let first = svc.refresh(&tokens.refresh_token).await.expect("first refresh");
    assert_ne!(first.access_token, tokens.access_token);
    assert_eq!(first.refresh_token, tokens.refresh_token);

    let second = svc.refresh(&tokens.refresh_token).await.expect("second refresh");
    assert_ne!(second.access_token, first.access_token);
    assert_eq!(second.refresh_token, tokens.refresh_token);

    // Logout revokes the session; the refresh token is dead immediately.
    svc.logout(&tokens.refresh_token).await.expect("logout");
    assert_matches!(
        svc.refresh(&tokens.refresh_token).await,
        Err(AuthError::SessionInvalid)
    );
}

#[tokio::test]
async fn refresh_rederives_roles_from_the_directory() {
    let verifier = MockCredentialVerifier::new();
    verifier.add_user("bob", "bobs-password-123", &[ROLE_USER]);
    let svc = service(
        verifier.clone(),
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    let tokens = svc
        .login("bob", "bobs-password-123", device("phone"))
        .await
        .expect("login");
    assert!(!tokens.roles.contains(ROLE_STREAMER));

    // A role granted after login shows up at the next refresh.
    verifier.set_roles("bob", &[ROLE_USER, ROLE_STREAMER]);
    let refreshed = svc.refresh(&tokens.refresh_token).await.expect("refresh");
    assert!(refreshed.roles.contains(ROLE_STREAMER));
}

#[tokio::test]
async fn logout_all_revokes_every_device() {
    let verifier = MockCredentialVerifier::new();
    let user_id = verifier.add_user("carol", "carols-password-456", &[ROLE_USER]);
    let svc = service(
        verifier,
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    let laptop = svc
        .login("carol", "carols-password-456", device("laptop"))
        .await
        .expect("laptop login");
    let phone = svc
        .login("carol", "carols-password-456", device("phone"))
        .await
        .expect("phone login");
    assert_eq!(svc.active_sessions(user_id).await.expect("list").len(), 2);

    let revoked = svc.logout_all(user_id).await.expect("logout all");
    assert_eq!(revoked, 2);

    assert!(svc.active_sessions(user_id).await.expect("list").is_empty());
    assert_matches!(
        svc.refresh(&laptop.refresh_token).await,
        Err(AuthError::SessionInvalid)
    );
    assert_matches!(
        svc.refresh(&phone.refresh_token).await,
        Err(AuthError::SessionInvalid)
    );
}

#[tokio::test]
async fn login_with_bad_credentials_is_rejected() {
    let verifier = MockCredentialVerifier::new();
    verifier.add_user("dave", "daves-password-789", &[ROLE_USER]);
    let svc = service(
        verifier,
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    assert_matches!(
        svc.login("dave", "wrong-password", device("laptop")).await,
        Err(AuthError::InvalidCredentials)
    );
    assert_matches!(
        svc.login("nobody", "daves-password-789", device("laptop")).await,
        Err(AuthError::InvalidCredentials)
    );
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let svc = service(
        MockCredentialVerifier::new(),
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    svc.register(alice(), device("laptop")).await.expect("first register");

    assert_matches!(
        svc.register(alice(), device("phone")).await,
        Err(AuthError::UsernameTaken)
    );

    let mut same_email = alice();
    same_email.username = "alice2".to_string();
    assert_matches!(
        svc.register(same_email, device("phone")).await,
        Err(AuthError::EmailTaken)
    );
}

#[tokio::test]
async fn access_token_cannot_drive_refresh_or_logout() {
    let svc = service(
        MockCredentialVerifier::new(),
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );

    let tokens = svc.register(alice(), device("laptop")).await.expect("register");

    // An access token has no session_id claim.
    assert_matches!(
        svc.refresh(&tokens.access_token).await,
        Err(AuthError::TokenMalformed(_))
    );
    assert_matches!(
        svc.logout(&tokens.access_token).await,
        Err(AuthError::TokenMalformed(_))
    );

    // Garbage is rejected outright.
    assert!(svc.refresh("definitely-not-a-jwt").await.is_err());
}

#[tokio::test]
async fn refresh_after_store_reset_is_not_found() {
    let verifier = MockCredentialVerifier::new();
    verifier.add_user("erin", "erins-password-000", &[ROLE_USER]);

    let tokens = {
        let svc = service(
            verifier.clone(),
            InMemorySessionStore::new(),
            InMemorySessionCache::new(),
        );
        svc.login("erin", "erins-password-000", device("laptop"))
            .await
            .expect("login")
    };

    // A fresh store no longer knows the session the token names.
    let svc = service(
        verifier,
        InMemorySessionStore::new(),
        InMemorySessionCache::new(),
    );
    assert_matches!(
        svc.refresh(&tokens.refresh_token).await,
        Err(AuthError::SessionNotFound)
    );
}
