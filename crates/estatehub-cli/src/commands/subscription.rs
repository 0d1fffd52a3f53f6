//! Subscription inspection and repair.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use estatehub_core::config::AppConfig;
use estatehub_core::error::AppError;
use estatehub_entity::subscription::Subscription;
use estatehub_service::SubscriptionLedger;

use crate::output::{self, OutputFormat};

/// Arguments for subscription commands
#[derive(Debug, Args)]
pub struct SubscriptionArgs {
    #[command(subcommand)]
    pub command: SubscriptionCommand,
}

/// Subscription subcommands
#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    /// Show a user's subscription, provisioning the free plan when missing
    Check {
        /// Email address of the account
        email: String,
    },
    /// List every subscription with its owner
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct SubscriptionRow {
    id: String,
    user: String,
    plan: String,
    cycle: String,
    status: String,
    price: i32,
    expires: String,
}

impl SubscriptionRow {
    fn new(sub: &Subscription, user: String) -> Self {
        Self {
            id: sub.id.to_string(),
            user,
            plan: sub.plan.to_string(),
            cycle: sub.billing_cycle.to_string(),
            status: sub.status.to_string(),
            price: sub.price,
            expires: sub
                .expiration_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute subscription commands
pub async fn execute(
    args: &SubscriptionArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let stores = super::open_stores(config).await?;
    let ledger = SubscriptionLedger::new(stores.subscriptions.clone(), stores.users.clone());

    match &args.command {
        SubscriptionCommand::Check { email } => {
            let user = super::find_user(&stores, email).await?;
            let existed = ledger.get_any(user.id).await?.is_some();
            let sub = ledger.ensure_subscription(user.id).await?;
            output::print_item(&SubscriptionRow::new(&sub, user.email.clone()), format);
            if !existed {
                output::print_success(&format!("Provisioned a free subscription for '{email}'"));
            }
        }
        SubscriptionCommand::List => {
            let rows: Vec<SubscriptionRow> = ledger
                .list_all_with_users()
                .await?
                .iter()
                .map(|row| {
                    let owner = row
                        .user
                        .as_ref()
                        .map(|u| u.email.clone())
                        .unwrap_or_else(|| row.subscription.user_id.to_string());
                    SubscriptionRow::new(&row.subscription, owner)
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
