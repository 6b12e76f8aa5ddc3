//! # Authentication Middleware
//!
//! Validates `Authorization: Bearer <token>` against the **standard** key pair
//! and injects the caller identity as [`AuthUser`] into request extensions.
//!
//! Public tokens (signed with the other key pair) and refresh tokens are refused.
//!
//! ```rust,ignore
//! use axum::{middleware, routing::get, Router};
//! use lib_web::middleware::mw_auth::require_auth;
//!
//! let protected = Router::new()
//!     .route("/api/users/me", get(handlers::users::me))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lib_auth::{decode, IdentityClaim, TokenIssuer, TokenKind};
use lib_core::{AppError, Result};
use tracing::{debug, warn};

/// Authenticated caller, available to handlers via `Extension<AuthUser>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
}

/// Authentication middleware that validates standard access tokens.
///
/// - **Valid access token**: continues with [`AuthUser`] in extensions
/// - **Missing header, malformed token, wrong key pair, refresh token, expired**: `401`
pub async fn require_auth(
    State(issuer): State<TokenIssuer>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("[AUTH] Missing Authorization header");
            AppError::Unauthorized("Missing authorization token".to_string())
        })?
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            warn!("[AUTH] Invalid Authorization header format");
            AppError::Unauthorized("Invalid authorization header".to_string())
        })?
        .trim()
        .to_string();

    let claims = decode::<IdentityClaim>(&token, issuer.keys().standard()).map_err(|e| {
        warn!("[AUTH] Token validation failed: {}", e);
        AppError::from(e)
    })?;

    if claims.payload.kind != TokenKind::Access {
        warn!("[AUTH] Refresh token presented as access token");
        return Err(AppError::Unauthorized("Invalid token".to_string()));
    }

    let user_id = claims.payload.sub.parse::<i64>().map_err(|_| {
        warn!("[AUTH] Non-numeric subject in token");
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    debug!("[AUTH] Authenticated user: {} (id: {})", claims.payload.username, user_id);

    req.extensions_mut().insert(AuthUser {
        user_id,
        username: claims.payload.username,
    });

    Ok(next.run(req).await)
}
