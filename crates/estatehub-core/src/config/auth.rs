//! Authentication configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Authentication and credential configuration.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    #[validate(length(min = 1))]
    pub jwt_secret: String,
    /// Token lifetime in days.
    #[serde(default = "default_token_ttl")]
    #[validate(range(min = 1, max = 365))]
    pub token_ttl_days: u64,
    /// How long a resolved identity stays in the cache, in seconds.
    #[serde(default = "default_identity_ttl")]
    pub identity_cache_ttl_seconds: u64,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    #[validate(range(min = 1, max = 128))]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_days: default_token_ttl(),
            identity_cache_ttl_seconds: default_identity_ttl(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    30
}

fn default_identity_ttl() -> u64 {
    300
}

fn default_password_min() -> usize {
    6
}
