//! # Centralized Error Handling
//!
//! This module defines the application-wide error type [`AppError`] and is the
//! error-to-response boundary: every failure that reaches a handler leaves the
//! service through [`IntoResponse`] as a status code plus a JSON body
//! `{ "error": <message>, "code": <kind> }`.
//!
//! ## Error Categories
//!
//! 1. **Client Errors** (4xx) - the message is safe to show
//!    - [`InvalidInput`](AppError::InvalidInput) → 400 Bad Request
//!    - [`Unauthorized`](AppError::Unauthorized) → 401 Unauthorized
//!    - [`Forbidden`](AppError::Forbidden) → 403 Forbidden
//!    - [`NotFound`](AppError::NotFound) → 404 Not Found
//!    - [`Conflict`](AppError::Conflict) → 409 Conflict
//!
//! 2. **Server Errors** (5xx) - the message is replaced with a generic one and
//!    the detail only goes to the server log
//!    - [`Config`](AppError::Config), [`Hashing`](AppError::Hashing),
//!      [`Signing`](AppError::Signing), [`Database`](AppError::Database),
//!      [`Internal`](AppError::Internal) → 500 Internal Server Error
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn parse_username(name: &str) -> Result<String> {
//!     if name.len() < 3 {
//!         return Err(AppError::InvalidInput(
//!             "Username must be at least 3 characters".to_string()
//!         ));
//!     }
//!     Ok(name.to_string())
//! }
//! ```

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application-wide error type covering all error scenarios.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input validation error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing, invalid or expired credentials or token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (e.g. deactivated account).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique resource already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password hashing primitive failure.
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Token construction or signing failure.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_)
            | AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-facing error message.
    ///
    /// Server-side failures collapse to a generic message so no stored hash,
    /// key material or query detail ever leaves the process.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Config(_)
            | AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Database(_)
            | AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    /// Stable machine-readable kind sent to clients.
    ///
    /// Every server-side kind reports `Internal`; the precise kind is only in the log.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::Config(_)
            | AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Database(_)
            | AppError::Internal(_) => "Internal",
        }
    }
}

/// Implement Axum's `IntoResponse` for automatic error handling.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full detail stays in the server log.
        if status.is_server_error() {
            tracing::error!("Server error: {}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        let body = Json(json!({
            "error": self.user_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

/// Convert `lib_auth::Error` to `AppError`.
impl From<lib_auth::Error> for AppError {
    fn from(err: lib_auth::Error) -> Self {
        use lib_auth::Error as AuthError;

        match err {
            AuthError::Hashing(msg) => AppError::Hashing(msg),
            AuthError::Signing(_) | AuthError::AudienceMismatch { .. } => {
                AppError::Signing(err.to_string())
            }
            AuthError::KeyMaterial(msg) => AppError::Config(msg),
            AuthError::InvalidToken(_) => AppError::Unauthorized("Invalid token".to_string()),
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".to_string()),
            AuthError::CredentialStore(msg) => AppError::Database(msg),
        }
    }
}

/// Convert `sqlx::Error` to `AppError`.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Resource already exists".to_string())
            }
            sqlx::Error::Database(db_err) => AppError::Database(db_err.message().to_string()),
            _ => AppError::Database(err.to_string()),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_hide_detail() {
        let errors = [
            AppError::Hashing("failed to parse stored hash $argon2id$v=19$...".to_string()),
            AppError::Signing("private key unusable".to_string()),
            AppError::Config("JWT_PRIVATE_KEY missing".to_string()),
            AppError::Database("no such table: users".to_string()),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.user_message(), "An internal error occurred");
            assert_eq!(err.code(), "Internal");
        }
    }

    #[test]
    fn test_auth_error_mapping() {
        let err: AppError = lib_auth::Error::TokenExpired.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.user_message(), "Token expired");

        let err: AppError = lib_auth::Error::InvalidToken("invalid signature".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.code(), "Unauthorized");

        let err: AppError = lib_auth::Error::AudienceMismatch {
            expected: "standard",
            actual: "public",
        }
        .into();
        assert!(matches!(err, AppError::Signing(_)));
        assert_eq!(err.code(), "Internal");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::Conflict("Email already registered".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::Hashing("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "An internal error occurred");
        assert_eq!(json["code"], "Internal");
        assert!(!String::from_utf8_lossy(&body).contains("secret detail"));
    }
}
