//! # Development Utilities
//!
//! RSA fixture keys for tests. Enabled for this crate's own tests and, through
//! the `test-utils` feature, for dependent crates' tests.

use serde::Serialize;

use crate::token::{Claims, KeyPair, TokenAudience, TokenKeys};

pub const STANDARD_PRIVATE_PEM: &str = include_str!("../../fixtures/standard_private.pem");
pub const STANDARD_PUBLIC_PEM: &str = include_str!("../../fixtures/standard_public.pem");
pub const PUBLIC_TOKEN_PRIVATE_PEM: &str = include_str!("../../fixtures/public_token_private.pem");
pub const PUBLIC_TOKEN_PUBLIC_PEM: &str = include_str!("../../fixtures/public_token_public.pem");

pub fn standard_key_pair() -> KeyPair {
    KeyPair::from_rsa_pem(
        TokenAudience::Standard,
        STANDARD_PRIVATE_PEM.as_bytes(),
        STANDARD_PUBLIC_PEM.as_bytes(),
    )
    .expect("standard fixture keys should parse")
}

pub fn public_key_pair() -> KeyPair {
    KeyPair::from_rsa_pem(
        TokenAudience::Public,
        PUBLIC_TOKEN_PRIVATE_PEM.as_bytes(),
        PUBLIC_TOKEN_PUBLIC_PEM.as_bytes(),
    )
    .expect("public-token fixture keys should parse")
}

pub fn token_keys() -> TokenKeys {
    TokenKeys::new(standard_key_pair(), public_key_pair())
        .expect("fixture key pairs should fill their own slots")
}

/// Sign `claims` verbatim with `key_pair`, bypassing the ttl and audience checks.
///
/// For building expired or otherwise hand-crafted tokens in tests.
pub fn sign_raw<P: Serialize>(claims: &Claims<P>, key_pair: &KeyPair) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256),
        claims,
        key_pair.encoding_key(),
    )
    .expect("fixture claims should sign")
}
