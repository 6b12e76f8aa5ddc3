//! # Authentication Handlers
//!
//! HTTP request handlers for the credential and token endpoints.
//!
//! ## Overview
//!
//! - User signup with username, email and password
//! - User login with email or username
//! - Refresh-token exchange
//! - Anonymous public tokens, signed with the public key pair
//!
//! Access and refresh tokens are signed with the **standard** key pair only.
//!
//! ## Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::post};
//! use lib_web::handlers::auth::{signup, login};
//!
//! let app = Router::new()
//!     .route("/api/auth/signup", post(signup))
//!     .route("/api/auth/login", post(login))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use lib_auth::{authenticate, decode, IdentityClaim, PasswordHasher, PublicClaim, TokenIssuer, TokenKind};
use lib_core::dto::{
    AuthResponse, LoginRequest, PublicTokenRequest, PublicTokenResponse, RefreshRequest,
    SignupRequest, UserInfo, BEARER,
};
use lib_core::model::store::models::{User, UserForCreate};
use lib_core::model::store::{UserCredentials, UserRepository};
use lib_core::{AppError, DbPool, Result};
use lib_utils::{
    format_time, validate_email, validate_min_length, validate_not_empty, validate_username,
};
use tracing::{debug, info, instrument, warn};

/// Minimum username length, in characters.
pub const MIN_USERNAME_LEN: usize = 3;
/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Longest accepted public-token client label.
pub const MAX_CLIENT_LEN: usize = 64;

/// Signup handler - creates a new user account.
///
/// # Returns
///
/// * `201 Created` with an [`AuthResponse`]
/// * `400` on validation failure, `409` when the email or username is taken
///
/// # Validation
///
/// - Username must be at least 3 characters, without `@` or whitespace
/// - Email must look like `local@domain.tld`
/// - Password must be at least 8 characters
#[instrument(skip_all, fields(username = %req.username, email = %req.email))]
pub async fn signup(
    State(pool): State<DbPool>,
    State(hasher): State<PasswordHasher>,
    State(issuer): State<TokenIssuer>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    info!("[SIGNUP] New user signup request");

    let username = req.username.trim();
    let email = req.email.trim();

    validate_min_length(username, MIN_USERNAME_LEN, "Username").map_err(AppError::InvalidInput)?;
    validate_username(username).map_err(AppError::InvalidInput)?;
    validate_email(email).map_err(AppError::InvalidInput)?;
    validate_min_length(&req.password, MIN_PASSWORD_LEN, "Password").map_err(AppError::InvalidInput)?;

    if UserRepository::find_by_email(&pool, email).await?.is_some() {
        warn!("[SIGNUP] Email already registered: {}", email);
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    if UserRepository::find_by_username(&pool, username).await?.is_some() {
        warn!("[SIGNUP] Username already taken: {}", username);
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    debug!("[SIGNUP] Hashing password...");
    let password_hash = hasher.hash(&req.password).await?;

    // A concurrent signup can still win the race; the UNIQUE index reports it as Conflict.
    let new_user = UserForCreate::new(username.to_string(), email.to_string(), password_hash);
    let user = UserRepository::create_with(&pool, new_user).await?;

    let response = token_response(&issuer, &user, "Signup successful").await?;

    info!("[SIGNUP] User created: {} (id: {})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login handler - authenticates an existing user.
///
/// # Returns
///
/// * `200 OK` with an [`AuthResponse`]
/// * `401` for an unknown identity or wrong password (indistinguishable)
/// * `403` for a deactivated account
#[instrument(skip_all, fields(identifier = %req.email_or_username))]
pub async fn login(
    State(pool): State<DbPool>,
    State(hasher): State<PasswordHasher>,
    State(issuer): State<TokenIssuer>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    info!("[LOGIN] Login attempt");

    let identifier = req.email_or_username.trim();
    validate_not_empty(identifier, "Email or username").map_err(AppError::InvalidInput)?;

    let store = UserCredentials::new(&pool);
    let Some(credential) = authenticate(&store, &hasher, identifier, &req.password).await? else {
        warn!("[LOGIN] Invalid credentials for: {}", identifier);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let user_id = parse_user_id(&credential.subject)?;
    let user = active_user(&pool, user_id).await?;

    UserRepository::update_last_login(&pool, user.id).await?;
    let user = active_user(&pool, user.id).await?;

    let response = token_response(&issuer, &user, "Login successful").await?;

    info!("[LOGIN] User authenticated: {} (id: {})", user.username, user.id);

    Ok((StatusCode::OK, Json(response)))
}

/// Refresh handler - exchanges a refresh token for a new access/refresh pair.
///
/// Only refresh tokens signed with the standard key pair are accepted; access
/// tokens and public tokens are refused with `401`.
#[instrument(skip_all)]
pub async fn refresh(
    State(pool): State<DbPool>,
    State(issuer): State<TokenIssuer>,
    Json(req): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    debug!("[REFRESH] Refresh request");

    let claims = decode::<IdentityClaim>(req.refresh_token.trim(), issuer.keys().standard())
        .map_err(|e| {
            warn!("[REFRESH] Token validation failed: {}", e);
            AppError::from(e)
        })?;

    if claims.payload.kind != TokenKind::Refresh {
        warn!("[REFRESH] Access token presented as refresh token");
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }

    let user_id = parse_user_id(&claims.payload.sub)?;
    let user = active_user(&pool, user_id).await?;

    let response = token_response(&issuer, &user, "Token refreshed").await?;

    info!("[REFRESH] Tokens refreshed for: {} (id: {})", user.username, user.id);

    Ok((StatusCode::OK, Json(response)))
}

/// Public token handler - issues an anonymous token signed with the public key pair.
///
/// The body is optional; `{ "client": "web" }` embeds a client label.
#[instrument(skip_all)]
pub async fn public_token(
    State(issuer): State<TokenIssuer>,
    body: Option<Json<PublicTokenRequest>>,
) -> Result<(StatusCode, Json<PublicTokenResponse>)> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let client = req
        .client
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    if let Some(client) = &client {
        if client.chars().count() > MAX_CLIENT_LEN {
            return Err(AppError::InvalidInput(format!(
                "Client must be at most {MAX_CLIENT_LEN} characters"
            )));
        }
    }

    let claim = PublicClaim::anonymous(client);
    let subject = claim.sub.clone();
    let issued = issuer.issue_public(claim).await?;

    info!("[PUBLIC TOKEN] Issued for subject: {}", subject);

    Ok((
        StatusCode::CREATED,
        Json(PublicTokenResponse {
            token: issued.token,
            token_type: BEARER.to_string(),
            expires_at: format_time(issued.expires_at),
        }),
    ))
}

// region:    --- Support

/// Issue an access/refresh pair for `user` and wrap it in an [`AuthResponse`].
async fn token_response(issuer: &TokenIssuer, user: &User, message: &str) -> Result<AuthResponse> {
    let subject = user.id.to_string();

    debug!("[TOKEN] Issuing access and refresh tokens...");
    let access = issuer.issue_access(&subject, &user.username).await?;
    let refresh = issuer.issue_refresh(&subject, &user.username).await?;

    Ok(AuthResponse {
        user: UserInfo::from(user),
        access_token: access.token,
        refresh_token: refresh.token,
        token_type: BEARER.to_string(),
        expires_at: format_time(access.expires_at),
        message: message.to_string(),
    })
}

/// Load a user that may still authenticate: unknown ids are `401`, deactivated accounts `403`.
async fn active_user(pool: &DbPool, user_id: i64) -> Result<User> {
    let user = UserRepository::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    if !user.is_active {
        warn!("[AUTH] Account deactivated: {}", user.username);
        return Err(AppError::Forbidden("Account is deactivated".to_string()));
    }

    Ok(user)
}

fn parse_user_id(subject: &str) -> Result<i64> {
    subject
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

// endregion: --- Support

#[cfg(test)]
mod tests;
