//! Image host selection from configuration.

use std::sync::Arc;

use tracing::info;

use estatehub_core::config::MediaConfig;
use estatehub_core::error::AppError;
use estatehub_core::result::AppResult;
use estatehub_core::traits::ImageHost;

/// Build the image host named by `media.provider`.
pub fn build_image_host(config: &MediaConfig) -> AppResult<Arc<dyn ImageHost>> {
    match config.provider.as_str() {
        #[cfg(feature = "imgbb")]
        "imgbb" => {
            if config.api_key.is_empty() {
                tracing::warn!("media.api_key is empty; image uploads will fail");
            }
            info!(endpoint = %config.endpoint, "Using ImgBB image host");
            let client =
                crate::providers::ImgbbClient::new(config.endpoint.clone(), config.api_key.clone())?;
            Ok(Arc::new(client))
        }
        other => Err(AppError::configuration(format!(
            "Unknown image host provider: '{other}'. Supported: imgbb"
        ))),
    }
}
