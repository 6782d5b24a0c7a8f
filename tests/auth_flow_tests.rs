use giftpair::{
    repositories::SqliteUserRepository,
    services::auth_service::{AuthService, AuthServiceError, LoginRequest},
    services::email_service::MockEmailService,
    services::user_service::{RegisterUserRequest, UserService, UserServiceError},
    services::verification_service::{VerificationError, VerificationService},
    test_utils::test_helpers,
};
use sqlx::SqlitePool;
use std::sync::Arc;

struct TestIdentity {
    pool: SqlitePool,
    users: UserService,
    auth: AuthService,
    verification: VerificationService,
}

async fn setup() -> TestIdentity {
    let pool = test_helpers::create_test_db().await.unwrap();
    let repository = Arc::new(SqliteUserRepository::new(pool.clone()));

    TestIdentity {
        pool: pool.clone(),
        users: UserService::new(repository.clone()),
        auth: AuthService::new(repository.clone()),
        verification: VerificationService::new(
            pool,
            Box::new(MockEmailService::new()),
            repository,
        ),
    }
}

fn register_request(email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        full_name: "Ana Silva".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
    }
}

#[tokio::test]
async fn test_registration_creates_inactive_user_with_code() {
    let ctx = setup().await;

    let user = ctx.users.register(register_request("ana@example.com")).await.unwrap();
    assert!(!user.is_active);
    assert!(user.code.starts_with('#'));
    assert_eq!(user.code.len(), 7);

    // Lookup by code works with and without the prefix.
    let by_code = ctx
        .users
        .find_user_by_code(user.code.trim_start_matches('#'))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.id, user.id);
}

#[tokio::test]
async fn test_registration_rejects_duplicate_email() {
    let ctx = setup().await;

    ctx.users.register(register_request("ana@example.com")).await.unwrap();

    let result = ctx.users.register(register_request("ana@example.com")).await;
    assert!(matches!(result, Err(UserServiceError::EmailTaken)));
}

#[tokio::test]
async fn test_login_requires_verified_account() {
    let ctx = setup().await;

    let user = ctx.users.register(register_request("ana@example.com")).await.unwrap();

    let result = ctx
        .auth
        .authenticate(LoginRequest {
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthServiceError::AccountNotVerified)));

    // Verify, then the same credentials work.
    let token = ctx.verification.send_verification(&user).await.unwrap();
    let verified = ctx.verification.verify_token(&token).await.unwrap();
    assert!(verified.is_active);

    let authed = ctx
        .auth
        .authenticate(LoginRequest {
            email: "ana@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(authed.id, user.id);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = setup().await;

    test_helpers::insert_test_user(&ctx.pool, "Ana", "ana@example.com", "password123", true)
        .await
        .unwrap();

    let result = ctx
        .auth
        .authenticate(LoginRequest {
            email: "ana@example.com".to_string(),
            password: "wrong-password".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let ctx = setup().await;

    let user = ctx.users.register(register_request("ana@example.com")).await.unwrap();
    let token = ctx.verification.send_verification(&user).await.unwrap();

    ctx.verification.verify_token(&token).await.unwrap();

    let result = ctx.verification.verify_token(&token).await;
    assert!(matches!(result, Err(VerificationError::TokenNotFound)));
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_removed() {
    let ctx = setup().await;

    let user = ctx.users.register(register_request("ana@example.com")).await.unwrap();

    let expired = (chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339();
    sqlx::query(
        "INSERT INTO email_verification_tokens (user_id, token, expires_at) VALUES (?, ?, ?)",
    )
    .bind(user.id)
    .bind("stale-token")
    .bind(&expired)
    .execute(&ctx.pool)
    .await
    .unwrap();

    let result = ctx.verification.verify_token("stale-token").await;
    assert!(matches!(result, Err(VerificationError::TokenNotFound)));

    let remaining: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM email_verification_tokens WHERE token = 'stale-token'")
            .fetch_optional(&ctx.pool)
            .await
            .unwrap();
    assert!(remaining.is_none());

    // Account stays inactive.
    let user = ctx.users.find_user_by_id(user.id).await.unwrap().unwrap();
    assert!(!user.is_active);
}

#[tokio::test]
async fn test_cleanup_expired_tokens() {
    let ctx = setup().await;

    let user = ctx.users.register(register_request("ana@example.com")).await.unwrap();

    let expired = (chrono::Utc::now() - chrono::Duration::hours(1)).to_rfc3339();
    sqlx::query(
        "INSERT INTO email_verification_tokens (user_id, token, expires_at) VALUES (?, ?, ?)",
    )
    .bind(user.id)
    .bind("stale-token")
    .bind(&expired)
    .execute(&ctx.pool)
    .await
    .unwrap();

    let live = ctx.verification.send_verification(&user).await.unwrap();

    ctx.verification.cleanup_expired_tokens().await.unwrap();

    let tokens: Vec<(String,)> =
        sqlx::query_as("SELECT token FROM email_verification_tokens WHERE user_id = ?")
            .bind(user.id)
            .fetch_all(&ctx.pool)
            .await
            .unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].0, live);
}
