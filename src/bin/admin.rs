//! CLI administration tool for cair-backend.
//!
//! Manages user accounts, checks the database and generates the RSA key pair
//! used to sign tokens, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a user (prompts for missing values)
//! cargo run --bin admin -- user create --username editor@cair.kz --admin
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Deactivate / reactivate an account
//! cargo run --bin admin -- user deactivate editor@cair.kz
//! cargo run --bin admin -- user activate editor@cair.kz
//!
//! # Promote to ADMIN
//! cargo run --bin admin -- user grant-admin editor@cair.kz
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db info
//!
//! # Write a PEM key pair for RSA_PRIVATE_KEY_PATH / RSA_PUBLIC_KEY_PATH
//! cargo run --bin admin -- keys generate --out-dir ./keys
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//!   (required by `user` and `db` commands)

use cair_backend::application::services::UserService;
use cair_backend::application::services::user_service::MIN_PASSWORD_LENGTH;
use cair_backend::config::Config;
use cair_backend::domain::entities::{Role, User};
use cair_backend::infrastructure::persistence::PgUserRepository;
use cair_backend::infrastructure::security::RsaKeyPair;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI tool for managing cair-backend.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// RSA key management
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Login name
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,

        /// Generate a random password instead of prompting
        #[arg(short, long, conflicts_with = "password")]
        generate: bool,

        /// Grant the ADMIN role instead of USER
        #[arg(long)]
        admin: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,

    /// Block a user from logging in
    Deactivate { username: String },

    /// Allow a deactivated user to log in again
    Activate { username: String },

    /// Grant the ADMIN role
    GrantAdmin { username: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[derive(Subcommand)]
enum KeysAction {
    /// Write a new 2048-bit RSA key pair as PEM files
    Generate {
        /// Output directory
        #[arg(short, long, default_value = "keys")]
        out_dir: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::User { action } => {
            let pool = connect().await?;
            handle_user_action(action, &pool).await?
        }
        Commands::Db { action } => {
            let pool = connect().await?;
            handle_db_action(action, &pool).await?
        }
        Commands::Keys { action } => handle_keys_action(action)?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let service = UserService::new(Arc::new(PgUserRepository::new(Arc::new(pool.clone()))));
    service
        .ensure_default_roles()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to provision roles: {}", e))?;

    match action {
        UserAction::Create {
            username,
            password,
            generate,
            admin,
            yes,
        } => create_user(&service, username, password, generate, admin, yes).await?,
        UserAction::List => list_users(&service).await?,
        UserAction::Deactivate { username } => set_active(&service, &username, false).await?,
        UserAction::Activate { username } => set_active(&service, &username, true).await?,
        UserAction::GrantAdmin { username } => grant_admin(&service, &username).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for username (or use provided)
/// 2. Prompt for password, use provided, or generate one
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Hash with argon2id and store
async fn create_user(
    service: &UserService,
    username: Option<String>,
    password: Option<String>,
    generate: bool,
    admin: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let (password, generated) = match password {
        Some(p) => (p, false),
        None if generate => (generate_password(), true),
        None => (
            Password::new()
                .with_prompt("Password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .validate_with(|input: &String| -> Result<(), String> {
                    if input.chars().count() >= MIN_PASSWORD_LENGTH {
                        Ok(())
                    } else {
                        Err(format!("At least {MIN_PASSWORD_LENGTH} characters"))
                    }
                })
                .interact()?,
            false,
        ),
    };

    let role = if admin { Role::Admin } else { Role::User };

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Username: {}", username.cyan());
    println!("  Role:     {}", role.to_string().cyan());
    if generated {
        println!("  Password: {}", password.bright_yellow().bold());
        println!();
        println!(
            "{}",
            "⚠️  Save this password now! It is stored only as a hash."
                .red()
                .bold()
        );
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let user = service
        .create_user(&username, &password, vec![role])
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ User created:".green().bold(),
        user.username.bright_white()
    );
    println!();

    Ok(())
}

/// Lists all users with their roles and status.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   ID  Username                       Roles          Created              Status
///   ─────────────────────────────────────────────────────────────────────────────────
///   1   admin@cair.kz                  ADMIN          2025-01-15 10:30     ACTIVE
/// ```
async fn list_users(service: &UserService) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = service
        .list_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<30} {:<14} {:<20} {:<10}",
        "ID".bright_white().bold(),
        "Username".bright_white().bold(),
        "Roles".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(81).bright_black());

    for user in &users {
        println!(
            "  {:<3} {:<30} {:<14} {:<20} {}",
            user.id.to_string().bright_black(),
            user.username.cyan(),
            roles_label(user),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            if user.is_active {
                "ACTIVE".green()
            } else {
                "INACTIVE".red()
            }
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn roles_label(user: &User) -> String {
    user.roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

/// Deactivation asks for confirmation (default: No).
async fn set_active(service: &UserService, username: &str, active: bool) -> Result<()> {
    if !active {
        let confirmed = Confirm::new()
            .with_prompt(format!("Deactivate '{username}'?"))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .set_active(username, active)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update user: {}", e))?;

    let verb = if active { "activated" } else { "deactivated" };
    println!("{}", format!("✅ User {verb}").green().bold());
    Ok(())
}

async fn grant_admin(service: &UserService, username: &str) -> Result<()> {
    service
        .grant_admin(username)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to grant ADMIN: {}", e))?;

    println!("{}", "✅ ADMIN role granted".green().bold());
    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL:   {}", version.bright_white());

            for (label, table) in [
                ("Projects", "projects"),
                ("Team members", "team_members"),
                ("Translations", "translations"),
                ("Users", "users"),
            ] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await
                    .with_context(|| format!("Failed to count {table}"))?;
                println!(
                    "  {:<13} {}",
                    format!("{label}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}

fn handle_keys_action(action: KeysAction) -> Result<()> {
    match action {
        KeysAction::Generate { out_dir, force } => generate_keys(&out_dir, force),
    }
}

/// Writes `private.pem` (PKCS#8) and `public.pem` (SPKI) into `out_dir`.
fn generate_keys(out_dir: &Path, force: bool) -> Result<()> {
    println!("{}", "🔐 Generate RSA key pair".bright_blue().bold());
    println!();

    let private_path = out_dir.join("private.pem");
    let public_path = out_dir.join("public.pem");

    if !force && (private_path.exists() || public_path.exists()) {
        anyhow::bail!(
            "{} already contains key files, pass --force to overwrite",
            out_dir.display()
        );
    }

    let keys = RsaKeyPair::generate().context("Failed to generate RSA key pair")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    fs::write(&private_path, keys.private_pem.as_bytes())
        .with_context(|| format!("Failed to write {}", private_path.display()))?;
    fs::write(&public_path, keys.public_pem.as_bytes())
        .with_context(|| format!("Failed to write {}", public_path.display()))?;

    println!("{}", "✅ Keys written".green().bold());
    println!();
    println!("{}", "Add this to your environment:".bright_white());
    println!(
        "  {}={}",
        "RSA_PRIVATE_KEY_PATH".bright_cyan(),
        private_path.display()
    );
    println!(
        "  {}={}",
        "RSA_PUBLIC_KEY_PATH".bright_cyan(),
        public_path.display()
    );
    println!();
    println!(
        "{}",
        "⚠️  Keep private.pem out of version control.".red().bold()
    );

    Ok(())
}

/// Generates a random password for `user create --generate`.
///
/// # Format
///
/// - Length: 20 characters
/// - Character set: A-Z, a-z, 0-9
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
