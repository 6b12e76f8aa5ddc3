//! # Authentication Errors
//!
//! Typed failures of the credential verifier and the token issuer.
//!
//! A credential mismatch is not represented here: [`compare`](crate::PasswordHasher::compare)
//! returns `Ok(false)`. Messages never contain plaintexts, stored hashes or key material.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The hashing primitive failed (bad parameters, malformed stored hash, worker failure).
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Token construction or signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Key material could not be parsed into a usable key.
    #[error("Key material error: {0}")]
    KeyMaterial(String),

    /// A token was presented to the wrong key pair or issuance path.
    #[error("Audience mismatch: expected {expected}, got {actual}")]
    AudienceMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The token signature, format or claims did not validate.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token validated but its `exp` has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The credential store could not be queried.
    #[error("Credential store error: {0}")]
    CredentialStore(String),
}
