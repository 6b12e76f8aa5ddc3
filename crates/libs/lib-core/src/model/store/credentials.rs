//! # Credential Store Adapter
//!
//! Implements [`lib_auth::CredentialStore`] over the users table so the
//! credential verifier can fetch stored hashes without knowing the schema.

use async_trait::async_trait;
use lib_auth::{CredentialStore, StoredCredential};

use super::{DbPool, UserRepository};

/// Credential lookups by email or username.
pub struct UserCredentials<'a> {
    pool: &'a DbPool,
}

impl<'a> UserCredentials<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserCredentials<'_> {
    type Error = sqlx::Error;

    async fn stored_credential(&self, identity: &str) -> Result<Option<StoredCredential>, sqlx::Error> {
        let user = UserRepository::find_by_identifier(self.pool, identity).await?;

        Ok(user.map(|user| StoredCredential {
            subject: user.id.to_string(),
            password_hash: user.password_hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_auth::{authenticate, PasswordHasher};
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_authenticate_against_users_table() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::MIGRATOR.run(&pool).await.unwrap();

        let hasher = PasswordHasher::new(1).unwrap();
        let hash = hasher.hash("correct-password").await.unwrap();
        let user = UserRepository::create(&pool, "alice", "alice@example.com", &hash)
            .await
            .unwrap();

        let store = UserCredentials::new(&pool);
        let credential = authenticate(&store, &hasher, "alice@example.com", "correct-password")
            .await
            .unwrap()
            .expect("correct password should match");
        assert_eq!(credential.subject, user.id.to_string());

        assert!(authenticate(&store, &hasher, "alice", "wrong-password")
            .await
            .unwrap()
            .is_none());
        assert!(authenticate(&store, &hasher, "nobody", "correct-password")
            .await
            .unwrap()
            .is_none());
    }
}
