//! # Signed Token Issuance
//!
//! RS256 JWT issuance with two independent signing key pairs, one per
//! [`TokenAudience`]. The audience is a property of the key pair, is written
//! into the `aud` claim, and is checked again on decode, so a token minted on
//! one path never validates on the other.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use lib_utils::now_utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task;
use uuid::Uuid;

use crate::error::{Error, Result};

const ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims written by the issuer; a payload may not carry them.
const RESERVED_CLAIMS: [&str; 4] = ["aud", "iat", "exp", "jti"];

// region:    --- Audience and keys

/// Intended consumer of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenAudience {
    /// Tokens for authenticated users.
    Standard,
    /// Tokens for unauthenticated, public-facing clients.
    Public,
}

impl TokenAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenAudience::Standard => "standard",
            TokenAudience::Public => "public",
        }
    }
}

impl std::fmt::Display for TokenAudience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RSA signing key pair bound to one audience.
///
/// The private half signs, the public half verifies. `Debug` never prints key material.
#[derive(Clone)]
pub struct KeyPair {
    audience: TokenAudience,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    /// Build a key pair from PEM-encoded RSA keys (PKCS#1 or PKCS#8 / SPKI).
    ///
    /// Fails with [`Error::KeyMaterial`] if either key does not parse or the
    /// two halves do not belong together.
    pub fn from_rsa_pem(
        audience: TokenAudience,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<Self> {
        let encoding = EncodingKey::from_rsa_pem(private_pem).map_err(|e| {
            Error::KeyMaterial(format!("{audience} private key is not a valid RSA PEM: {e}"))
        })?;
        let decoding = DecodingKey::from_rsa_pem(public_pem).map_err(|e| {
            Error::KeyMaterial(format!("{audience} public key is not a valid RSA PEM: {e}"))
        })?;

        let pair = Self {
            audience,
            encoding,
            decoding,
        };
        pair.probe()?;

        Ok(pair)
    }

    pub fn audience(&self) -> TokenAudience {
        self.audience
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Sign and verify a throwaway token to prove the halves match.
    fn probe(&self) -> Result<()> {
        let probe = sign(&Probe { probe: true }, self, Duration::minutes(1)).map_err(|e| {
            Error::KeyMaterial(format!("{} private key cannot sign: {e}", self.audience))
        })?;

        decode::<Probe>(&probe.token, self).map(|_| ()).map_err(|_| {
            Error::KeyMaterial(format!(
                "{} private and public keys do not form a pair",
                self.audience
            ))
        })
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("audience", &self.audience)
            .field("keys", &"[redacted]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct Probe {
    probe: bool,
}

/// The two named key-pair slots.
#[derive(Clone, Debug)]
pub struct TokenKeys {
    standard: KeyPair,
    public: KeyPair,
}

impl TokenKeys {
    /// Fails if a pair is placed in the slot of the other audience.
    pub fn new(standard: KeyPair, public: KeyPair) -> Result<Self> {
        expect_audience(&standard, TokenAudience::Standard)?;
        expect_audience(&public, TokenAudience::Public)?;
        Ok(Self { standard, public })
    }

    pub fn get(&self, audience: TokenAudience) -> &KeyPair {
        match audience {
            TokenAudience::Standard => &self.standard,
            TokenAudience::Public => &self.public,
        }
    }

    pub fn standard(&self) -> &KeyPair {
        &self.standard
    }

    pub fn public(&self) -> &KeyPair {
        &self.public
    }
}

fn expect_audience(key_pair: &KeyPair, expected: TokenAudience) -> Result<()> {
    if key_pair.audience == expected {
        Ok(())
    } else {
        Err(Error::AudienceMismatch {
            expected: expected.as_str(),
            actual: key_pair.audience.as_str(),
        })
    }
}
// endregion: --- Audience and keys

// region:    --- Claims

/// Purpose of a standard-audience token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity carried by standard tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub kind: TokenKind,
}

impl IdentityClaim {
    pub fn access(sub: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            kind: TokenKind::Access,
        }
    }

    pub fn refresh(sub: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            kind: TokenKind::Refresh,
        }
    }
}

/// Payload of public tokens: an anonymous session subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicClaim {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

impl PublicClaim {
    /// A fresh anonymous subject (`public:<uuid>`).
    pub fn anonymous(client: Option<String>) -> Self {
        Self {
            sub: format!("public:{}", Uuid::new_v4()),
            client,
        }
    }
}

/// Full claim set: the caller payload plus registered claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims<P> {
    #[serde(flatten)]
    pub payload: P,
    /// Audience name (`standard` or `public`)
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// A signed token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub audience: TokenAudience,
    pub expires_at: DateTime<Utc>,
}
// endregion: --- Claims

// region:    --- Issue / decode

/// Issue a standard token for `identity`, valid for `ttl`.
///
/// `key_pair` must be the standard pair.
pub fn issue(identity: &IdentityClaim, key_pair: &KeyPair, ttl: Duration) -> Result<IssuedToken> {
    expect_audience(key_pair, TokenAudience::Standard)?;
    sign(identity, key_pair, ttl)
}

/// Issue a public token carrying `payload`, valid for `ttl`.
///
/// `key_pair` must be the public-token pair.
pub fn issue_public_token<P: Serialize>(
    payload: &P,
    key_pair: &KeyPair,
    ttl: Duration,
) -> Result<IssuedToken> {
    expect_audience(key_pair, TokenAudience::Public)?;
    sign(payload, key_pair, ttl)
}

fn sign<P: Serialize>(payload: &P, key_pair: &KeyPair, ttl: Duration) -> Result<IssuedToken> {
    if ttl <= Duration::zero() {
        return Err(Error::Signing("token ttl must be positive".to_string()));
    }

    let now = now_utc();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| Error::Signing("token ttl is out of range".to_string()))?;

    let payload = payload_object(payload)?;

    let claims = Claims {
        payload,
        aud: key_pair.audience.as_str().to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &key_pair.encoding)
        .map_err(|e| Error::Signing(format!("failed to encode token: {e}")))?;

    Ok(IssuedToken {
        token,
        audience: key_pair.audience,
        // `exp` has second resolution; report what the token actually says.
        expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(expires_at),
    })
}

/// Serialize `payload` to a JSON object that leaves the registered claims to `sign`.
fn payload_object<P: Serialize>(payload: &P) -> Result<Map<String, Value>> {
    let value = serde_json::to_value(payload)
        .map_err(|e| Error::Signing(format!("failed to serialize payload: {e}")))?;

    let Value::Object(map) = value else {
        return Err(Error::Signing("token payload must be a JSON object".to_string()));
    };

    if let Some(key) = RESERVED_CLAIMS.iter().find(|key| map.contains_key(**key)) {
        return Err(Error::Signing(format!("token payload must not set reserved claim `{key}`")));
    }

    Ok(map)
}

/// Verify signature, expiry and audience of `token` against `key_pair`.
pub fn decode<P: DeserializeOwned>(token: &str, key_pair: &KeyPair) -> Result<Claims<P>> {
    let mut validation = Validation::new(ALGORITHM);
    validation.set_audience(&[key_pair.audience.as_str()]);
    validation.set_required_spec_claims(&["exp", "aud"]);

    jsonwebtoken::decode::<Claims<P>>(token, &key_pair.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => Error::TokenExpired,
            ErrorKind::InvalidSignature => Error::InvalidToken("invalid signature".to_string()),
            ErrorKind::InvalidAudience => Error::InvalidToken("invalid audience".to_string()),
            _ => Error::InvalidToken(e.to_string()),
        })
}
// endregion: --- Issue / decode

// region:    --- TokenIssuer

/// Lifetimes of the three token flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTtls {
    pub access: Duration,
    pub refresh: Duration,
    pub public: Duration,
}

/// Async issuance front-end over [`TokenKeys`].
///
/// Picks the slot for each path and signs on the blocking pool.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    keys: Arc<TokenKeys>,
    ttls: TokenTtls,
}

impl TokenIssuer {
    pub fn new(keys: Arc<TokenKeys>, ttls: TokenTtls) -> Self {
        Self { keys, ttls }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub fn ttls(&self) -> TokenTtls {
        self.ttls
    }

    /// Access token for a verified user.
    pub async fn issue_access(&self, sub: &str, username: &str) -> Result<IssuedToken> {
        let identity = IdentityClaim::access(sub, username);
        let ttl = self.ttls.access;
        self.run(move |keys| issue(&identity, keys.standard(), ttl)).await
    }

    /// Refresh token for a verified user.
    pub async fn issue_refresh(&self, sub: &str, username: &str) -> Result<IssuedToken> {
        let identity = IdentityClaim::refresh(sub, username);
        let ttl = self.ttls.refresh;
        self.run(move |keys| issue(&identity, keys.standard(), ttl)).await
    }

    /// Public token for an unauthenticated client.
    pub async fn issue_public(&self, payload: PublicClaim) -> Result<IssuedToken> {
        let ttl = self.ttls.public;
        self.run(move |keys| issue_public_token(&payload, keys.public(), ttl)).await
    }

    async fn run<F>(&self, op: F) -> Result<IssuedToken>
    where
        F: FnOnce(&TokenKeys) -> Result<IssuedToken> + Send + 'static,
    {
        let keys = Arc::clone(&self.keys);
        task::spawn_blocking(move || op(&keys))
            .await
            .map_err(|e| Error::Signing(format!("signing task failed: {e}")))?
    }
}
// endregion: --- TokenIssuer

#[cfg(test)]
mod tests;
