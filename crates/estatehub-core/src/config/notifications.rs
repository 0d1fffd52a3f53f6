//! New-listing notification configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fan-out worker settings.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Whether new listings are announced to users at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Capacity of the hand-off queue between requests and the worker.
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1))]
    pub queue_capacity: usize,
    /// Number of fan-out reports kept in memory.
    #[serde(default = "default_report_history")]
    pub report_history: usize,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            queue_capacity: default_queue_capacity(),
            report_history: default_report_history(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_queue_capacity() -> usize {
    256
}

fn default_report_history() -> usize {
    50
}
