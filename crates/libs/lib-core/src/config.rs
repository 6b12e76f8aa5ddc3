//! # Application Configuration
//!
//! This module loads configuration from environment variables once at start-up.
//! The resulting [`Config`] is immutable and passed explicitly (as axum state) to
//! every component that needs it; there is no global accessor.
//!
//! All values are validated on load to fail fast if misconfigured:
//! key material must parse and each private key must match its public key,
//! TTLs must parse and be positive, and the hash cost must be in range.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! # fn main() -> lib_core::Result<()> {
//! let config = Config::from_env()?;
//! let issuer = config.token_issuer();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use chrono::Duration;
use lib_auth::pwd::{DEFAULT_COST, MAX_COST, MIN_COST};
use lib_auth::token::TokenTtls;
use lib_auth::{KeyPair, PasswordHasher, TokenAudience, TokenIssuer, TokenKeys};
use lib_utils::{b64_decode_to_string, get_env, parse_ttl};

use crate::error::{AppError, Result};

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3333;

/// Longest accepted refresh-token lifetime, in days.
pub const MAX_REFRESH_DAYS: i64 = 365;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// HTTP listen port
    pub port: u16,

    /// Standard and public-token signing key pairs
    pub token_keys: Arc<TokenKeys>,

    /// Access-token lifetime (`JWT_TOKEN_EXPIRES_IN`)
    pub jwt_token_ttl: Duration,

    /// Public-token lifetime (`PUBLIC_TOKEN_EXPIRES_IN`)
    pub public_token_ttl: Duration,

    /// Refresh-token lifetime (`REFRESH_TOKEN_EXPIRES_IN`, in days)
    pub refresh_token_ttl: Duration,

    /// Argon2 time cost (`HASH_COST`)
    pub hash_cost: u32,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| get_env(name).ok())
    }

    /// Load configuration through `lookup` and validate it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{name} must be set in environment")))
        };

        let database_url = required("DATABASE_URL")?;

        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?,
            None => DEFAULT_PORT,
        };

        let standard = key_pair(
            TokenAudience::Standard,
            ("JWT_PRIVATE_KEY", &required("JWT_PRIVATE_KEY")?),
            ("JWT_PUBLIC_KEY", &required("JWT_PUBLIC_KEY")?),
        )?;
        let public = key_pair(
            TokenAudience::Public,
            ("APP_PRIVATE_KEY", &required("APP_PRIVATE_KEY")?),
            ("PUBLIC_KEY", &required("PUBLIC_KEY")?),
        )?;
        if read_pem("JWT_PUBLIC_KEY", &required("JWT_PUBLIC_KEY")?)?.trim()
            == read_pem("PUBLIC_KEY", &required("PUBLIC_KEY")?)?.trim()
        {
            return Err(AppError::Config(
                "JWT_PUBLIC_KEY and PUBLIC_KEY must be different key pairs".to_string(),
            ));
        }
        let token_keys = TokenKeys::new(standard, public)
            .map_err(|e| AppError::Config(e.to_string()))?;

        let jwt_token_ttl = ttl("JWT_TOKEN_EXPIRES_IN", &required("JWT_TOKEN_EXPIRES_IN")?)?;
        let public_token_ttl = ttl("PUBLIC_TOKEN_EXPIRES_IN", &required("PUBLIC_TOKEN_EXPIRES_IN")?)?;

        let refresh_days: i64 = required("REFRESH_TOKEN_EXPIRES_IN")?
            .trim()
            .parse()
            .map_err(|_| {
                AppError::Config("REFRESH_TOKEN_EXPIRES_IN must be a whole number of days".to_string())
            })?;
        if !(1..=MAX_REFRESH_DAYS).contains(&refresh_days) {
            return Err(AppError::Config(format!(
                "REFRESH_TOKEN_EXPIRES_IN must be between 1 and {MAX_REFRESH_DAYS} days"
            )));
        }

        let hash_cost = match lookup("HASH_COST") {
            Some(cost) => cost
                .trim()
                .parse()
                .map_err(|_| AppError::Config("HASH_COST must be a valid number".to_string()))?,
            None => DEFAULT_COST,
        };

        let config = Self {
            database_url,
            port,
            token_keys: Arc::new(token_keys),
            jwt_token_ttl,
            public_token_ttl,
            refresh_token_ttl: Duration::days(refresh_days),
            hash_cost,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values against security and deployment rules.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(AppError::Config(
                "DATABASE_URL must be a sqlite: connection URL".to_string(),
            ));
        }

        if self.port == 0 {
            return Err(AppError::Config("PORT must not be 0".to_string()));
        }

        if !(MIN_COST..=MAX_COST).contains(&self.hash_cost) {
            return Err(AppError::Config(format!(
                "HASH_COST must be between {MIN_COST} and {MAX_COST}"
            )));
        }

        for (name, ttl) in [
            ("JWT_TOKEN_EXPIRES_IN", self.jwt_token_ttl),
            ("PUBLIC_TOKEN_EXPIRES_IN", self.public_token_ttl),
            ("REFRESH_TOKEN_EXPIRES_IN", self.refresh_token_ttl),
        ] {
            if ttl <= Duration::zero() {
                return Err(AppError::Config(format!("{name} must be positive")));
            }
        }

        Ok(())
    }

    /// Token issuer over the configured key pairs and lifetimes.
    pub fn token_issuer(&self) -> TokenIssuer {
        TokenIssuer::new(
            Arc::clone(&self.token_keys),
            TokenTtls {
                access: self.jwt_token_ttl,
                refresh: self.refresh_token_ttl,
                public: self.public_token_ttl,
            },
        )
    }

    /// Password hasher with the configured work factor.
    pub fn password_hasher(&self) -> Result<PasswordHasher> {
        PasswordHasher::new(self.hash_cost).map_err(|e| AppError::Config(e.to_string()))
    }
}

/// Key material may be raw PEM (optionally with escaped `\n`) or base64-encoded PEM.
fn read_pem(name: &str, raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.starts_with("-----BEGIN") {
        return Ok(raw.replace("\\n", "\n"));
    }

    b64_decode_to_string(raw)
        .ok()
        .filter(|pem| pem.trim_start().starts_with("-----BEGIN"))
        .ok_or_else(|| AppError::Config(format!("{name} must be a PEM or base64-encoded PEM")))
}

fn key_pair(
    audience: TokenAudience,
    (private_name, private_raw): (&str, &str),
    (public_name, public_raw): (&str, &str),
) -> Result<KeyPair> {
    let private_pem = read_pem(private_name, private_raw)?;
    let public_pem = read_pem(public_name, public_raw)?;

    KeyPair::from_rsa_pem(audience, private_pem.as_bytes(), public_pem.as_bytes()).map_err(|e| {
        AppError::Config(format!("{private_name}/{public_name}: {e}"))
    })
}

fn ttl(name: &str, raw: &str) -> Result<Duration> {
    parse_ttl(raw).map_err(|_| {
        AppError::Config(format!(
            "{name} must be a positive duration such as 3600, 15m, 1h or 7d"
        ))
    })
}
