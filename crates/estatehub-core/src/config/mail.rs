//! Outbound email configuration.

use serde::{Deserialize, Serialize};

/// Transactional mail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Mailer provider: `"http"` (JSON relay) or `"log"` (no delivery).
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Relay endpoint receiving `{from, to, subject, text, html}`.
    #[serde(default)]
    pub endpoint: String,
    /// Bearer key sent to the relay.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default = "default_from")]
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: String::new(),
            api_key: String::new(),
            from: default_from(),
        }
    }
}

fn default_provider() -> String {
    "log".to_string()
}

fn default_from() -> String {
    "EstateHub <no-reply@estatehub.local>".to_string()
}
