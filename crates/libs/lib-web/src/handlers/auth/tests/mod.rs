//! # Auth Handler Tests
//!
//! Test suite for the auth and users endpoints, driven through the full router.

mod login;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use lib_auth::PasswordHasher;
use lib_core::model::store::UserRepository;
use lib_core::{Config, DbPool, MIGRATOR};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use crate::server::{create_router, AppState};

pub const PASSWORD: &str = "TestPassword123!";

/// Setup an in-memory test database with the real schema.
pub async fn setup_test_db() -> DbPool {
    // One connection so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create test config with the fixture key pairs and the cheapest hash cost.
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 3333,
        token_keys: Arc::new(lib_auth::_dev_utils::token_keys()),
        jwt_token_ttl: Duration::minutes(15),
        public_token_ttl: Duration::hours(1),
        refresh_token_ttl: Duration::days(7),
        hash_cost: 1,
    }
}

/// Create test app with the production router.
pub fn test_app(pool: DbPool, config: Config) -> Router {
    let state = AppState::new(pool, &config).expect("test state should build");
    create_router(state, &[])
}

/// Insert a user whose password is [`PASSWORD`].
pub async fn create_user(pool: &DbPool, username: &str, email: &str) -> i64 {
    let hasher = PasswordHasher::new(1).expect("cost 1 is valid");
    let password_hash = hasher
        .hash(PASSWORD)
        .await
        .expect("Password hashing should succeed in test");

    UserRepository::create(pool, username, email, &password_hash)
        .await
        .expect("User creation should succeed in test")
        .id
}

/// POST `body` as JSON and return the status and decoded body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

/// GET `uri`, optionally with a bearer token.
pub async fn get_with_bearer(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}
