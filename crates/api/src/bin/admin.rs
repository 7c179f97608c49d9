//! Bizdesk maintenance CLI.
//!
//! Operator tasks that have no HTTP surface: bootstrapping the first super
//! admin, re-enabling locked-out accounts and converting contact messages
//! into client records.

use std::process::ExitCode;

use anyhow::Context;
use bizdesk_api::auth::password::hash_password;
use bizdesk_api::telemetry::init_tracing;
use bizdesk_core::client::client_from_contact;
use bizdesk_core::roles::AdminRole;
use bizdesk_core::validation::password_strength;
use bizdesk_db::models::admin::CreateAdmin;
use bizdesk_db::repositories::{AdminRepo, ClientRepo, ContactRepo};
use bizdesk_db::DbPool;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bizdesk-admin", about = "Bizdesk maintenance tasks", version)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the first super admin. Does nothing if one already exists.
    CreateSuperAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BIZDESK_ADMIN_PASSWORD")]
        password: String,
    },
    /// Activate or deactivate an admin by email
    SetActive {
        #[arg(long)]
        email: String,
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        active: bool,
    },
    /// Open a client record for every contact message whose email has none
    MigrateContacts,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let pool = bizdesk_db::create_pool(&cli.database_url, 5)
        .await
        .context("failed to connect to database")?;
    bizdesk_db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let code = match cli.command {
        Command::CreateSuperAdmin {
            username,
            email,
            password,
        } => create_super_admin(&pool, username, email, password).await?,
        Command::SetActive { email, active } => set_active(&pool, &email, active).await?,
        Command::MigrateContacts => migrate_contacts(&pool).await?,
    };

    pool.close().await;
    Ok(code)
}

async fn create_super_admin(
    pool: &DbPool,
    username: String,
    email: String,
    password: String,
) -> anyhow::Result<ExitCode> {
    if AdminRepo::exists_with_role(pool, AdminRole::SuperAdmin).await? {
        tracing::warn!("A super admin already exists; nothing to do");
        return Ok(ExitCode::SUCCESS);
    }

    if let Err(e) = password_strength(&password) {
        tracing::error!(reason = %e, "Password rejected");
        return Ok(ExitCode::FAILURE);
    }

    let email = email.trim().to_lowercase();
    let username = username.trim().to_string();
    if AdminRepo::find_conflict(pool, Some(&username), Some(&email), None)
        .await?
        .is_some()
    {
        tracing::error!(%username, %email, "Username or email already taken");
        return Ok(ExitCode::FAILURE);
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;
    let admin = AdminRepo::create(
        pool,
        &CreateAdmin {
            username,
            email,
            password_hash,
            role: AdminRole::SuperAdmin,
        },
    )
    .await
    .context("failed to insert super admin")?;

    tracing::info!(admin_id = %admin.id, username = %admin.username, "Super admin created");
    Ok(ExitCode::SUCCESS)
}

async fn set_active(pool: &DbPool, email: &str, active: bool) -> anyhow::Result<ExitCode> {
    let email = email.trim().to_lowercase();
    match AdminRepo::set_active_by_email(pool, &email, active).await? {
        Some(admin) => {
            tracing::info!(admin_id = %admin.id, active, "Admin status updated");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            tracing::error!(%email, "No admin with that email");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn migrate_contacts(pool: &DbPool) -> anyhow::Result<ExitCode> {
    let contacts = ContactRepo::list_all(pool).await?;
    let total = contacts.len();
    let mut migrated = 0usize;
    let mut skipped = 0usize;

    for contact in contacts {
        if ClientRepo::exists_by_email(pool, &contact.email).await? {
            tracing::debug!(contact_id = %contact.id, email = %contact.email, "Client exists, skipping");
            skipped += 1;
            continue;
        }

        let profile = client_from_contact(contact.to_lead());
        match ClientRepo::create(pool, &profile).await {
            Ok(client) => {
                tracing::info!(
                    contact_id = %contact.id,
                    client_id = %client.client_id,
                    "Contact migrated",
                );
                migrated += 1;
            }
            Err(e) => {
                tracing::warn!(contact_id = %contact.id, error = %e, "Contact migration failed");
                skipped += 1;
            }
        }
    }

    tracing::info!(migrated, skipped, total, "Contact migration finished");
    Ok(ExitCode::SUCCESS)
}
