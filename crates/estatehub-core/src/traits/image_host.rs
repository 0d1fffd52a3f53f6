//! External image hosting capability.

use async_trait::async_trait;

use crate::result::AppResult;

/// A remote service that stores images and hands back public URLs.
///
/// Listings only ever persist the URLs returned here.
#[async_trait]
pub trait ImageHost: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider identifier used in logs.
    fn provider_name(&self) -> &str;

    /// Upload base64-encoded image bytes (no `data:` prefix) and return
    /// the hosted URL.
    async fn upload_base64(&self, encoded: &str, name: Option<&str>) -> AppResult<String>;
}
