//! # Credential Store Boundary
//!
//! The only persistence capability the verifier needs: fetch the stored hash
//! for an identity. Implementations live with the database layer.

use async_trait::async_trait;

/// A stored credential as returned by a [`CredentialStore`].
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Stable subject identifier (user id) to embed in issued tokens.
    pub subject: String,
    /// PHC-formatted salted hash.
    pub password_hash: String,
}

impl std::fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredCredential")
            .field("subject", &self.subject)
            .field("password_hash", &"[redacted]")
            .finish()
    }
}

/// Fetch-stored-hash-for-identity capability.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up the credential for `identity` (email or username).
    ///
    /// Returns `Ok(None)` when no such identity exists.
    async fn stored_credential(
        &self,
        identity: &str,
    ) -> std::result::Result<Option<StoredCredential>, Self::Error>;
}
