//! # User Handlers
//!
//! Endpoints for the authenticated user. Mounted behind
//! [`require_auth`](crate::middleware::require_auth).

use axum::extract::{Extension, Json, State};
use lib_core::dto::UserInfo;
use lib_core::model::store::UserRepository;
use lib_core::{AppError, DbPool, Result};
use tracing::{debug, instrument};

use crate::middleware::AuthUser;

/// Current user profile.
#[instrument(skip_all, fields(user_id = auth.user_id))]
pub async fn me(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserInfo>> {
    debug!("[ME] Loading profile for: {}", auth.username);

    let user = UserRepository::find_by_id(&pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserInfo::from(&user)))
}
