//! Response envelopes that are not bare entities.

use serde::Serialize;

use estatehub_entity::subscription::Subscription;

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// `DELETE /subscription`.
#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub message: &'static str,
    pub subscription: Subscription,
}
