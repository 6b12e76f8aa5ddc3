//! # Authentication Library
//!
//! Credential verification (salted adaptive password hashing) and signed token
//! issuance with two independent signing key pairs.
//!
//! - [`pwd`]: [`PasswordHasher`] `hash` / `compare`, and [`authenticate`] over a
//!   [`CredentialStore`].
//! - [`token`]: [`TokenAudience`], [`KeyPair`], [`TokenKeys`], [`issue`],
//!   [`issue_public_token`] and [`decode`].

pub mod error;
pub mod pwd;
pub mod store;
pub mod token;

#[cfg(any(test, feature = "test-utils"))]
pub mod _dev_utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pwd::{authenticate, PasswordHasher};
pub use store::{CredentialStore, StoredCredential};
pub use token::{
    decode, issue, issue_public_token, Claims, IdentityClaim, IssuedToken, KeyPair, PublicClaim,
    TokenAudience, TokenIssuer, TokenKeys, TokenKind,
};
