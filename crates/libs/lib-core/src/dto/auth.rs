//! # Authentication Data Transfer Objects
//!
//! Request and response structures for the auth and users endpoints.
//!
//! ## Endpoints Using These DTOs
//!
//! - `POST /api/auth/signup` - [`SignupRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/login` - [`LoginRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/refresh` - [`RefreshRequest`] -> [`AuthResponse`]
//! - `POST /api/auth/public-token` - [`PublicTokenRequest`] (optional) -> [`PublicTokenResponse`]
//! - `GET /api/users/me` -> [`UserInfo`]
//!
//! Errors on every endpoint are an [`ErrorResponse`].
//!
//! ## Wire Format
//!
//! All DTOs use **snake_case** field names in JSON (default serde behavior).
//! Optional fields are omitted when `None`.
//!
//! ```text
//! POST /api/auth/login
//! Content-Type: application/json
//!
//! {
//!   "email_or_username": "alice",
//!   "password": "MyPassword123!"
//! }
//! ```
//!
//! Response:
//! ```text
//! {
//!   "user": { "id": "1", "username": "alice", "email": "alice@example.com", "created_at": "..." },
//!   "access_token": "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "refresh_token": "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9...",
//!   "token_type": "Bearer",
//!   "expires_at": "2025-01-01T01:00:00+00:00",
//!   "message": "Login successful"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::store::models::User;

/// Token type reported in every token response.
pub const BEARER: &str = "Bearer";

/// Signup request. The password is hashed before storage and never logged.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login request with email or username.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Treated as an email when it contains `@`, as a username otherwise.
    pub email_or_username: String,
    pub password: String,
}

/// Exchange a refresh token for a new token pair.
#[derive(Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Optional body of the public token request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublicTokenRequest {
    /// Free-form client label embedded in the token (e.g. "web").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: lib_utils::format_time(user.created_at),
            last_login: user.last_login.map(lib_utils::format_time),
        }
    }
}

/// Successful signup / login / refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token expiry (RFC3339)
    pub expires_at: String,
    pub message: String,
}

/// Successful public token issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicTokenResponse {
    pub token: String,
    pub token_type: String,
    /// RFC3339
    pub expires_at: String,
}

/// Error body produced by [`AppError`](crate::AppError).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// region:    --- Redacted Debug
impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email_or_username", &self.email_or_username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &"[redacted]")
            .finish()
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user", &self.user)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
// endregion: --- Redacted Debug

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_debug_hides_secrets() {
        let req = LoginRequest {
            email_or_username: "alice".to_string(),
            password: "correct-password".to_string(),
        };
        let rendered = format!("{req:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("correct-password"));
    }

    #[test]
    fn test_public_token_request_body_is_optional_fields() {
        let req: PublicTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.client.is_none());
    }
}
