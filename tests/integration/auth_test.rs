//! Integration tests for registration, login and refresh-token rotation.

mod helpers;

use chrono::{Duration, Utc};

use docvault_core::error::ErrorKind;
use docvault_database::AccountStore;
use docvault_service::RequestContext;

use helpers::{PASSWORD, TestApp, assert_kind, register_request};

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();

    let registered = app
        .auth
        .register(register_request("alice@example.com", PASSWORD))
        .await
        .unwrap();
    assert_eq!(registered.email, "alice@example.com");
    assert_eq!(registered.message, "User Registered Successfully");

    let tokens = app.auth.login("alice@example.com", PASSWORD).await.unwrap();
    assert_eq!(tokens.message, "Logged in Successfully");
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
    assert!(tokens.refresh_expires_at > Utc::now() + Duration::days(6));
    assert!(tokens.access_expires_at > Utc::now());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    assert!(app.auth.login("ALICE@example.com", PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_access_token_verifies_and_names_the_account() {
    let app = TestApp::new();
    let user_id = app.register("alice@example.com").await;

    let tokens = app.auth.login("alice@example.com", PASSWORD).await.unwrap();
    let claims = app.decoder.verify_access_token(&tokens.access_token).unwrap();

    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.iss, app.config.jwt_issuer);

    let ctx = RequestContext::from_claims(&claims);
    assert_eq!(ctx.user_id, user_id);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let err = assert_kind(
        app.auth
            .register(register_request("Alice@Example.com", PASSWORD))
            .await,
        ErrorKind::Conflict,
    );
    assert_eq!(err.message, "User already exists.");
}

#[tokio::test]
async fn test_weak_password_is_rejected() {
    let app = TestApp::new();

    assert_kind(
        app.auth
            .register(register_request("alice@example.com", "password"))
            .await,
        ErrorKind::Validation,
    );
    assert_kind(
        app.auth
            .register(register_request("alice@example.com", "Sh0rt!"))
            .await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = TestApp::new();

    assert_kind(
        app.auth.register(register_request("not-an-email", PASSWORD)).await,
        ErrorKind::Validation,
    );
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let wrong_password = assert_kind(
        app.auth.login("alice@example.com", "Wr0ng!Pass").await,
        ErrorKind::Authentication,
    );
    let unknown_email = assert_kind(
        app.auth.login("nobody@example.com", PASSWORD).await,
        ErrorKind::Authentication,
    );

    assert_eq!(wrong_password.message, "Invalid email or password");
    assert_eq!(wrong_password.message, unknown_email.message);
}

#[tokio::test]
async fn test_inactive_account_cannot_log_in() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let mut account = AccountStore::find_by_email(app.store.as_ref(), "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    account.is_active = false;
    AccountStore::update(app.store.as_ref(), &account).await.unwrap();

    let err = assert_kind(
        app.auth.login("alice@example.com", PASSWORD).await,
        ErrorKind::Authentication,
    );
    assert_eq!(err.message, "Invalid email or password");
}

#[tokio::test]
async fn test_refresh_rotates_the_token() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let first = app.auth.login("alice@example.com", PASSWORD).await.unwrap();
    let second = app
        .auth
        .refresh("alice@example.com", &first.refresh_token)
        .await
        .unwrap();

    assert_eq!(second.message, "Token refreshed successfully");
    assert_ne!(second.refresh_token, first.refresh_token);

    // The presented token is single use.
    let err = assert_kind(
        app.auth.refresh("alice@example.com", &first.refresh_token).await,
        ErrorKind::Authentication,
    );
    assert_eq!(err.message, "Invalid or expired refresh token");

    assert!(
        app.auth
            .refresh("alice@example.com", &second.refresh_token)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_login_invalidates_previous_refresh_token() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let first = app.auth.login("alice@example.com", PASSWORD).await.unwrap();
    app.auth.login("alice@example.com", PASSWORD).await.unwrap();

    assert_kind(
        app.auth.refresh("alice@example.com", &first.refresh_token).await,
        ErrorKind::Authentication,
    );
}

#[tokio::test]
async fn test_expired_refresh_token_is_rejected() {
    let app = TestApp::new();
    app.register("alice@example.com").await;
    let tokens = app.auth.login("alice@example.com", PASSWORD).await.unwrap();

    let mut account = AccountStore::find_by_email(app.store.as_ref(), "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    account.refresh_token_expiry = Some(Utc::now() - Duration::seconds(1));
    AccountStore::update(app.store.as_ref(), &account).await.unwrap();

    let err = assert_kind(
        app.auth.refresh("alice@example.com", &tokens.refresh_token).await,
        ErrorKind::Authentication,
    );
    assert_eq!(err.message, "Invalid or expired refresh token");
}

#[tokio::test]
async fn test_refresh_without_login_is_rejected() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    assert_kind(
        app.auth.refresh("alice@example.com", "").await,
        ErrorKind::Authentication,
    );
    assert_kind(
        app.auth.refresh("nobody@example.com", "anything").await,
        ErrorKind::Authentication,
    );
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let app = TestApp::new();
    app.register("alice@example.com").await;

    let account = AccountStore::find_by_email(app.store.as_ref(), "alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!account.password_hash.is_empty());
    assert!(!account.password_salt.is_empty());
    assert_ne!(account.password_hash, PASSWORD.as_bytes());
}
