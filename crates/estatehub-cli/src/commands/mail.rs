//! Mail delivery checks.

use clap::{Args, Subcommand};

use estatehub_core::config::AppConfig;
use estatehub_core::error::AppError;
use estatehub_core::traits::EmailMessage;
use estatehub_notify::build_mailer;

use crate::output;

#[derive(Debug, Args)]
pub struct MailArgs {
    #[command(subcommand)]
    pub command: MailCommand,
}

#[derive(Debug, Subcommand)]
pub enum MailCommand {
    /// Send a test message through the configured mailer
    Test {
        /// Recipient address
        email: String,
    },
}

pub async fn execute(args: &MailArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MailCommand::Test { email } => {
            let mailer = build_mailer(&config.mail)?;
            let message = EmailMessage {
                to: email.clone(),
                subject: "EstateHub test email".to_string(),
                text: "This is a test message from EstateHub. Mail delivery is working."
                    .to_string(),
                html: "<p>This is a test message from EstateHub. Mail delivery is working.</p>"
                    .to_string(),
            };
            mailer.send(&message).await?;
            output::print_success(&format!(
                "Test email sent to '{email}' via {}",
                mailer.provider_name()
            ));
        }
    }
    Ok(())
}
