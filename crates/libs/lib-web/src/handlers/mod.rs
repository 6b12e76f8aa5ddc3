//! # HTTP Request Handlers
//!
//! Axum HTTP request handlers organized by feature domain.
//!
//! ## Handler Modules
//!
//! - **[`auth`]**: Credential and token endpoints
//!   - `POST /api/auth/signup` - Create new user account
//!   - `POST /api/auth/login` - Authenticate with email or username and password
//!   - `POST /api/auth/refresh` - Exchange a refresh token for a new token pair
//!   - `POST /api/auth/public-token` - Issue an anonymous public token
//!
//! - **[`users`]**: Authenticated user endpoints
//!   - `GET /api/users/me` - Current user profile
//!
//! ## Handler Architecture
//!
//! All handlers follow Axum's extractor pattern and return
//! [`lib_core::Result`], so every failure leaves through
//! [`AppError`](lib_core::AppError)'s `IntoResponse`:
//!
//! ```rust,ignore
//! async fn handler(
//!     State(db): State<DbPool>,                 // Shared state
//!     Extension(user): Extension<AuthUser>,     // Set by require_auth
//!     Json(payload): Json<RequestBody>,         // Request body
//! ) -> lib_core::Result<Json<Response>> {
//!     Ok(Json(response))
//! }
//! ```
//!
//! ## Request/Response Flow
//!
//! ```text
//! Client Request
//!     ↓
//! CORS / request stamp / trace / logging
//!     ↓
//! require_auth (protected routes only)
//!     ↓
//! Handler
//!     ↓
//! JSON response or AppError body
//! ```

pub mod auth;
pub mod users;
