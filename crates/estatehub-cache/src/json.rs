//! Typed JSON helpers over any [`CacheProvider`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use estatehub_core::result::AppResult;
use estatehub_core::traits::CacheProvider;

/// Store and load serde values as JSON strings.
#[async_trait]
pub trait CacheJsonExt: CacheProvider {
    /// Load and decode `key`.
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and store `value` under `key` for `ttl`.
    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl).await
    }
}

impl<P: CacheProvider + ?Sized> CacheJsonExt for P {}
