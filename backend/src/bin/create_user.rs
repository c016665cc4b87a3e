//! Create a staff account in the registry database.
//!
//! ```text
//! REGISTRY_NEW_USER_PASSWORD=s3cret create-user --username officer.ada
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::runtime::Builder;
use zeroize::Zeroizing;

use license_registry::domain::UserAccountService;
use license_registry::domain::ports::UserAdministration;
use license_registry::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_migrations,
};
use license_registry::outbound::security::Argon2PasswordHasher;

const DATABASE_URL_ENV: &str = "REGISTRY_DATABASE_URL";
const PASSWORD_ENV: &str = "REGISTRY_NEW_USER_PASSWORD";

/// `create-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-user",
    about = "Create a staff account with an argon2-hashed password",
    version
)]
struct CliArgs {
    /// Login name for the new account.
    #[arg(long, value_name = "name")]
    username: String,
    /// Password for the new account. Falls back to `REGISTRY_NEW_USER_PASSWORD`.
    #[arg(long, value_name = "password")]
    password: Option<String>,
    /// Database connection URL. Falls back to `REGISTRY_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations before inserting.
    #[arg(long)]
    migrate: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::try_parse()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = non_blank(args.database_url, DATABASE_URL_ENV, "--database-url")?;
    let password = Zeroizing::new(non_blank(args.password, PASSWORD_ENV, "--password")?);

    if args.migrate {
        let url = database_url.clone();
        let applied = tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .wrap_err("migration task panicked")??;
        println!("applied_migrations={applied}");
    }

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("create database pool")?;
    let accounts = UserAccountService::new(
        Arc::new(DieselUserRepository::new(pool)),
        Arc::new(Argon2PasswordHasher::default()),
    );
    let user = accounts
        .create_user(&args.username, &password)
        .await
        .map_err(|error| eyre!("create user failed: {error}"))?;

    println!("id={}", user.id());
    println!("username={}", user.username());
    Ok(())
}

/// Use `explicit` when given, otherwise the environment variable `var`.
/// Either source must be non-blank.
fn non_blank(explicit: Option<String>, var: &str, flag: &str) -> Result<String> {
    let value = match explicit {
        Some(value) => value,
        None => env::var(var).map_err(|_| eyre!("missing value: set {flag} or {var}"))?,
    };
    if value.trim().is_empty() {
        return Err(eyre!("{flag} / {var} must not be empty"));
    }
    Ok(value)
}
