//! # Login Tests
//!
//! Tests for user login functionality.

use super::*;
use lib_core::dto::AuthResponse;
use serde_json::json;

#[tokio::test]
async fn test_login_success_with_email() {
    // Arrange
    let pool = setup_test_db().await;
    create_user(&pool, "testuser", "test@example.com").await;
    let app = test_app(pool, test_config());

    // Act
    let (status, body) = post_json(
        app,
        "/api/auth/login",
        json!({ "email_or_username": "test@example.com", "password": PASSWORD }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let auth_response: AuthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(auth_response.user.username, "testuser");
    assert_eq!(auth_response.message, "Login successful");
    assert!(!auth_response.access_token.is_empty());
    assert!(auth_response.user.last_login.is_some());
}

#[tokio::test]
async fn test_login_success_with_username() {
    let pool = setup_test_db().await;
    create_user(&pool, "testuser", "test@example.com").await;
    let app = test_app(pool, test_config());

    let (status, body) = post_json(
        app,
        "/api/auth/login",
        json!({ "email_or_username": "testuser", "password": PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "test@example.com");
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_the_same() {
    let pool = setup_test_db().await;
    create_user(&pool, "testuser", "test@example.com").await;
    let config = test_config();

    let (wrong_status, wrong_body) = post_json(
        test_app(pool.clone(), config.clone()),
        "/api/auth/login",
        json!({ "email_or_username": "testuser", "password": "WrongPassword123!" }),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        test_app(pool, config),
        "/api/auth/login",
        json!({ "email_or_username": "nobody", "password": PASSWORD }),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_deactivated_account() {
    let pool = setup_test_db().await;
    let id = create_user(&pool, "testuser", "test@example.com").await;
    UserRepository::set_active(&pool, id, false).await.unwrap();
    let app = test_app(pool, test_config());

    let (status, body) = post_json(
        app,
        "/api/auth/login",
        json!({ "email_or_username": "testuser", "password": PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Account is deactivated");
}

#[tokio::test]
async fn test_login_deactivated_account_with_wrong_password_is_unauthorized() {
    let pool = setup_test_db().await;
    let id = create_user(&pool, "testuser", "test@example.com").await;
    UserRepository::set_active(&pool, id, false).await.unwrap();
    let app = test_app(pool, test_config());

    let (status, _) = post_json(
        app,
        "/api/auth/login",
        json!({ "email_or_username": "testuser", "password": "WrongPassword123!" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_empty_identifier() {
    let app = test_app(setup_test_db().await, test_config());

    let (status, _) = post_json(
        app,
        "/api/auth/login",
        json!({ "email_or_username": "  ", "password": PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
