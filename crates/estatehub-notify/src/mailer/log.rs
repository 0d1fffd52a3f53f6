//! Mailer that only logs.

use async_trait::async_trait;
use tracing::info;

use estatehub_core::result::AppResult;
use estatehub_core::traits::{EmailMessage, Mailer};

/// Logs each message instead of delivering it. For development.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn provider_name(&self) -> &str {
        "log"
    }

    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email (not delivered)"
        );
        Ok(())
    }
}
