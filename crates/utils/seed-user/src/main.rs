//! # Seed User Utility
//!
//! Creates a user account directly in the database, hashing the password with
//! the same Argon2 settings as the service.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --package seed-user --bin seed_user -- <username> <email>
//! ```
//!
//! The program will:
//! 1. Connect to `DATABASE_URL` and apply pending migrations
//! 2. Read the password from stdin
//! 3. Hash it with `HASH_COST` (default 2)
//! 4. Insert the user and report its id

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use lib_auth::pwd::DEFAULT_COST;
use lib_auth::PasswordHasher;
use lib_core::model::store::models::UserForCreate;
use lib_core::model::store::UserRepository;
use lib_core::{create_pool, MIGRATOR};
use lib_utils::{get_env, get_env_parse, validate_email, validate_min_length, validate_username};

const MIN_PASSWORD_LEN: usize = 8;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(email)) = (args.next(), args.next()) else {
        bail!("usage: seed_user <username> <email>");
    };

    validate_min_length(&username, 3, "Username").map_err(anyhow::Error::msg)?;
    validate_username(&username).map_err(anyhow::Error::msg)?;
    validate_email(&email).map_err(anyhow::Error::msg)?;

    println!("============================================");
    println!("  Seed User Utility");
    println!("============================================");
    println!();

    let database_url = get_env("DATABASE_URL")?;
    let cost = match std::env::var("HASH_COST") {
        Ok(_) => get_env_parse::<u32>("HASH_COST")?,
        Err(_) => DEFAULT_COST,
    };
    let hasher = PasswordHasher::new(cost).context("HASH_COST out of range")?;

    println!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    MIGRATOR.run(&pool).await?;
    println!("Connected successfully.");
    println!();

    print!("Password for {username}: ");
    io::stdout().flush()?;

    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']);
    validate_min_length(password, MIN_PASSWORD_LEN, "Password").map_err(anyhow::Error::msg)?;

    let password_hash = hasher.hash(password).await?;
    let user = UserRepository::create_with(&pool, UserForCreate::new(username, email, password_hash))
        .await
        .context("failed to create user (username or email may already exist)")?;

    println!();
    println!("Created user {} (id: {}).", user.username, user.id);

    Ok(())
}
