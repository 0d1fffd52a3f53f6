//! CLI command definitions and dispatch.

pub mod mail;
pub mod migrate;
pub mod serve;
pub mod subscription;
pub mod user;

use clap::{Parser, Subcommand};

use estatehub_core::config::AppConfig;
use estatehub_core::error::AppError;
use estatehub_database::Stores;

use crate::output::OutputFormat;

/// EstateHub: real-estate listings with subscription quotas
#[derive(Debug, Parser)]
#[command(name = "estatehub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and the environment overlays
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Environment overlay to load on top of default.toml
    #[arg(short, long, env = "ESTATEHUB_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Subscription inspection and repair
    Subscription(subscription::SubscriptionArgs),
    /// Mail delivery checks
    Mail(mail::MailArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Subscription(args) => {
                subscription::execute(args, &config, self.format).await
            }
            Commands::Mail(args) => mail::execute(args, &config).await,
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        AppConfig::load_from(&self.config_dir, &self.env)
    }
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    Stores::from_config(&config.database).await
}

/// Helper: find a user by email or fail with a readable message
pub async fn find_user(
    stores: &Stores,
    email: &str,
) -> Result<estatehub_entity::user::User, AppError> {
    stores
        .users
        .find_by_email(&email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::not_found(format!("User '{email}' not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::parse_from([
            "estatehub",
            "--format",
            "json",
            "subscription",
            "check",
            "ana@example.com",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Subscription(_)));
    }
}
