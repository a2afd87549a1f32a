use axum::http::{HeaderMap, HeaderValue, header};
use blog_portal::{
    AuthService, MemoryRepository, TokenCodec,
    auth::{AuthError, Rejection},
    models::{Role, Session, User},
    repository::RepositoryState,
    security,
    token::Claims,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use uuid::Uuid;

// --- Helpers ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_PASSWORD: &str = "sup3r-secret";

struct TestAuth {
    auth: AuthService,
    repo: RepositoryState,
    role_id: Uuid,
}

/// Builds an AuthService over an in-memory store seeded with one role
/// (`post.create` + `post.update`) and one account ("tester") holding it.
async fn auth_with_fixtures() -> TestAuth {
    let repo: RepositoryState = Arc::new(MemoryRepository::new());

    let role = Role {
        id: Uuid::new_v4(),
        name: "author".to_string(),
        permissions: vec!["post.create".to_string(), "post.update".to_string()],
    };
    repo.insert_role(role.clone()).await.unwrap();

    let user = User {
        id: Uuid::new_v4(),
        role_id: role.id,
        name: "Test Author".to_string(),
        username: "tester".to_string(),
        password_hash: security::hash_password(TEST_PASSWORD).unwrap(),
    };
    repo.insert_user(user).await.unwrap();

    let auth = AuthService::new(repo.clone(), TokenCodec::new(TEST_JWT_SECRET));

    TestAuth {
        auth,
        repo,
        role_id: role.id,
    }
}

fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

/// Signs a token directly, bypassing login, so tests can control the expiry
/// and the role id embedded in the claims.
fn forge_token(role_id: Uuid, exp_offset_secs: i64) -> String {
    let claims = Claims {
        authorized: true,
        sub: Uuid::new_v4(),
        role_id,
        exp: (Utc::now().timestamp() + exp_offset_secs) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn assert_rejected(result: Result<(), AuthError>, expected: Rejection) {
    match result {
        Err(AuthError::Rejected(reason)) => assert_eq!(reason, expected),
        other => panic!("expected rejection {:?}, got {:?}", expected, other),
    }
}

// --- Guard Tests ---

#[tokio::test]
async fn test_empty_requirements_allow_anonymous_requests() {
    let fixture = auth_with_fixtures().await;

    // No credentials at all.
    let result = fixture
        .auth
        .check_authorization(&HeaderMap::new(), &[])
        .await;
    assert!(result.is_ok());

    // Garbage credentials are equally irrelevant when nothing is required.
    let result = fixture
        .auth
        .check_authorization(&bearer_headers("not-even-a-token"), &[])
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_missing_authorization_header_rejected() {
    let fixture = auth_with_fixtures().await;

    let result = fixture
        .auth
        .check_authorization(&HeaderMap::new(), &["post.create"])
        .await;
    assert_rejected(result, Rejection::MissingCredential);
}

#[tokio::test]
async fn test_header_without_bearer_prefix_rejected() {
    let fixture = auth_with_fixtures().await;

    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));

    let result = fixture
        .auth
        .check_authorization(&headers, &["post.create"])
        .await;
    assert_rejected(result, Rejection::MissingCredential);
}

#[tokio::test]
async fn test_token_without_session_rejected() {
    let fixture = auth_with_fixtures().await;

    // Structurally valid, unexpired, correctly signed — but never logged in,
    // so no session row exists. The ledger is authoritative.
    let token = forge_token(fixture.role_id, 3600);

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["post.create"])
        .await;
    assert_rejected(result, Rejection::InvalidSession);
}

#[tokio::test]
async fn test_expired_token_rejected_despite_active_session() {
    let fixture = auth_with_fixtures().await;

    let token = forge_token(fixture.role_id, -120);
    fixture
        .repo
        .insert_session(&Session {
            token: token.clone(),
            created_at: Utc::now(),
            active: true,
        })
        .await
        .unwrap();

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["post.create"])
        .await;
    assert_rejected(result, Rejection::InvalidToken);
}

#[tokio::test]
async fn test_login_then_authorized_request_succeeds() {
    let fixture = auth_with_fixtures().await;

    let token = fixture.auth.login("tester", TEST_PASSWORD).await.unwrap();

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["post.create"])
        .await;
    assert!(result.is_ok());

    // Multi-permission requirement against the same role.
    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["post.create", "post.update"])
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_permission_not_granted_rejected() {
    let fixture = auth_with_fixtures().await;

    let token = fixture.auth.login("tester", TEST_PASSWORD).await.unwrap();

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["role.create"])
        .await;
    assert_rejected(result, Rejection::PermissionDenied);
}

#[tokio::test]
async fn test_logout_ends_session_for_valid_token() {
    let fixture = auth_with_fixtures().await;

    let token = fixture.auth.login("tester", TEST_PASSWORD).await.unwrap();

    let stopped = fixture.auth.logout(&token).await.unwrap();
    assert!(stopped);

    // The token is still signed and unexpired, but its session has ended.
    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&token), &["post.create"])
        .await;
    assert_rejected(result, Rejection::SessionEnded);
}

#[tokio::test]
async fn test_logout_of_unknown_token_reports_nothing_stopped() {
    let fixture = auth_with_fixtures().await;

    let stopped = fixture.auth.logout("no-such-token").await.unwrap();
    assert!(!stopped);
}

#[tokio::test]
async fn test_role_deleted_after_issuance_rejected() {
    let repo: RepositoryState = Arc::new(MemoryRepository::new());

    // The account points at a role id that is absent from the store, which is
    // indistinguishable from a role deleted after the token was issued.
    let user = User {
        id: Uuid::new_v4(),
        role_id: Uuid::new_v4(),
        name: "Orphan".to_string(),
        username: "orphan".to_string(),
        password_hash: security::hash_password(TEST_PASSWORD).unwrap(),
    };
    repo.insert_user(user).await.unwrap();

    let auth = AuthService::new(repo.clone(), TokenCodec::new(TEST_JWT_SECRET));

    let token = auth.login("orphan", TEST_PASSWORD).await.unwrap();

    let result = auth
        .check_authorization(&bearer_headers(&token), &["post.create"])
        .await;
    assert_rejected(result, Rejection::RoleMissing);
}

// --- Login Tests ---

#[tokio::test]
async fn test_login_with_wrong_password_rejected() {
    let fixture = auth_with_fixtures().await;

    let result = fixture.auth.login("tester", "wrong-password").await;
    match result {
        Err(AuthError::Rejected(Rejection::InvalidCredentials)) => {}
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_with_unknown_username_rejected() {
    let fixture = auth_with_fixtures().await;

    let result = fixture.auth.login("nobody", TEST_PASSWORD).await;
    match result {
        Err(AuthError::Rejected(Rejection::InvalidCredentials)) => {}
        other => panic!("expected InvalidCredentials, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_logins_keep_independent_sessions() {
    let fixture = auth_with_fixtures().await;

    let first = fixture.auth.login("tester", TEST_PASSWORD).await.unwrap();
    // Claims carry second-granularity expiry; crossing a second boundary
    // keeps the two tokens distinct.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = fixture.auth.login("tester", TEST_PASSWORD).await.unwrap();
    assert_ne!(first, second);

    // Ending the second session leaves the first usable (multi-device login).
    fixture.auth.logout(&second).await.unwrap();

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&first), &["post.create"])
        .await;
    assert!(result.is_ok());

    let result = fixture
        .auth
        .check_authorization(&bearer_headers(&second), &["post.create"])
        .await;
    assert_rejected(result, Rejection::SessionEnded);
}
