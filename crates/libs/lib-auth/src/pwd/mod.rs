//! # Password Hashing
//!
//! Salted adaptive password hashing and verification using Argon2id.
//!
//! The work factor is fixed per deployment and maps to the Argon2 time cost.
//! Hashing and comparison are CPU-bound, so both run on tokio's blocking pool.

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use tokio::task;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::{CredentialStore, StoredCredential};

/// Smallest accepted work factor.
pub const MIN_COST: u32 = 1;
/// Largest accepted work factor.
pub const MAX_COST: u32 = 10;
/// Work factor used when the deployment does not configure one.
pub const DEFAULT_COST: u32 = Params::DEFAULT_T_COST;

/// Argon2id hasher configured with the deployment work factor.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher with the given time cost (`MIN_COST..=MAX_COST`).
    pub fn new(cost: u32) -> Result<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(Error::Hashing(format!(
                "cost factor must be between {MIN_COST} and {MAX_COST}, got {cost}"
            )));
        }

        let params = Params::new(
            Params::DEFAULT_M_COST,
            cost,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| Error::Hashing(format!("invalid parameters: {e}")))?;

        Ok(Self { params })
    }

    /// The configured time cost.
    pub fn cost(&self) -> u32 {
        self.params.t_cost()
    }

    /// Hash a plaintext with a fresh random salt.
    ///
    /// Two calls with the same plaintext produce different hashes.
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();

        task::spawn_blocking(move || hash_blocking(params, &plaintext))
            .await
            .map_err(|e| Error::Hashing(format!("hashing task failed: {e}")))?
    }

    /// Compare a plaintext against a stored hash.
    ///
    /// A mismatch is `Ok(false)`. Only a malformed stored hash or a primitive
    /// failure is an error.
    pub async fn compare(&self, plaintext: &str, stored_hash: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();

        task::spawn_blocking(move || compare_blocking(&plaintext, &stored_hash))
            .await
            .map_err(|e| Error::Hashing(format!("comparison task failed: {e}")))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

fn hash_blocking(params: Params, plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Hashing(format!("failed to hash password: {e}")))
}

fn compare_blocking(plaintext: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::Hashing(format!("failed to parse stored hash: {e}")))?;

    // Parameters and salt come from the stored hash itself.
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Hashing(format!("failed to verify password: {e}"))),
    }
}

/// Verify `plaintext` for `identity` against the hash held by `store`.
///
/// Returns the stored credential on a match and `None` when the identity is
/// unknown or the password is wrong. An unknown identity still pays for one
/// hash so both outcomes take comparable time.
pub async fn authenticate<S: CredentialStore>(
    store: &S,
    hasher: &PasswordHasher,
    identity: &str,
    plaintext: &str,
) -> Result<Option<StoredCredential>> {
    let credential = store
        .stored_credential(identity)
        .await
        .map_err(|e| Error::CredentialStore(e.to_string()))?;

    let Some(credential) = credential else {
        debug!("[AUTH] Unknown identity, burning one hash");
        hasher.hash(plaintext).await?;
        return Ok(None);
    };

    if hasher.compare(plaintext, &credential.password_hash).await? {
        Ok(Some(credential))
    } else {
        Ok(None)
    }
}
