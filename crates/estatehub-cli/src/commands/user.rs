//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use estatehub_core::config::AppConfig;
use estatehub_core::error::AppError;
use estatehub_entity::user::{User, UserRole};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List {
        /// Filter by role (owner, realtor, admin)
        #[arg(short, long)]
        role: Option<UserRole>,
    },
    /// Grant the admin role
    Promote {
        /// Email address of the account
        email: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;

    match &args.command {
        UserCommand::List { role } => {
            let users = stores.users.find_all().await?;
            let rows: Vec<UserRow> = users
                .iter()
                .filter(|u| role.is_none_or(|r| u.role == r))
                .map(UserRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::Promote { email } => {
            let mut user = super::find_user(&stores, email).await?;
            if user.role == UserRole::Admin {
                output::print_success(&format!("User '{email}' is already an admin"));
                return Ok(());
            }
            user.role = UserRole::Admin;
            user.updated_at = chrono::Utc::now();
            stores.users.update(&user).await?;
            output::print_success(&format!("User '{email}' promoted to admin"));
        }
    }

    Ok(())
}
