//! Short-lived cache of resolved identities, keyed by user id.
//!
//! Backed by whatever [`CacheProvider`] the process runs with, so entries
//! expire on read once their TTL has passed. Cache failures degrade to a
//! miss; the user store stays authoritative.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use estatehub_cache::{CacheJsonExt, keys};
use estatehub_core::config::AuthConfig;
use estatehub_core::traits::CacheProvider;
use estatehub_entity::user::UserSummary;

/// Identity cache over a [`CacheProvider`].
#[derive(Debug, Clone)]
pub struct IdentityCache {
    cache: Arc<dyn CacheProvider>,
    ttl: Duration,
}

impl IdentityCache {
    pub fn new(cache: Arc<dyn CacheProvider>, config: &AuthConfig) -> Self {
        Self {
            cache,
            ttl: Duration::from_secs(config.identity_cache_ttl_seconds),
        }
    }

    /// The cached identity for `user_id`, if present and fresh.
    pub async fn get(&self, user_id: Uuid) -> Option<UserSummary> {
        match self.cache.get_json(&keys::identity(user_id)).await {
            Ok(found) => found,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Identity cache read failed");
                None
            }
        }
    }

    /// Remember `identity` for the configured TTL.
    pub async fn put(&self, identity: &UserSummary) {
        if let Err(e) = self
            .cache
            .set_json(&keys::identity(identity.id), identity, self.ttl)
            .await
        {
            warn!(user_id = %identity.id, error = %e, "Identity cache write failed");
        }
    }

    /// Drop the entry for `user_id`.
    pub async fn evict(&self, user_id: Uuid) {
        if let Err(e) = self.cache.delete(&keys::identity(user_id)).await {
            warn!(user_id = %user_id, error = %e, "Identity cache eviction failed");
        }
    }
}
