//! ImgBB image host client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use estatehub_core::error::{AppError, ErrorKind};
use estatehub_core::result::AppResult;
use estatehub_core::traits::ImageHost;

const USER_AGENT: &str = concat!("estatehub/", env!("CARGO_PKG_VERSION"));

/// Uploads images to ImgBB with a form-encoded `image` field.
#[derive(Debug, Clone)]
pub struct ImgbbClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    data: UploadedImage,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: String,
}

impl ImgbbClient {
    /// Build a client for `endpoint`. Uses the client's default timeouts.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

/// Pull the hosted URL out of an upload response body.
fn parse_upload_response(body: &[u8]) -> AppResult<String> {
    let parsed: UploadResponse = serde_json::from_slice(body)
        .map_err(|e| AppError::image_upload(format!("ImgBB upload failed: invalid response: {e}")))?;
    if parsed.data.url.is_empty() {
        return Err(AppError::image_upload(
            "ImgBB upload failed: response carried no URL",
        ));
    }
    Ok(parsed.data.url)
}

#[async_trait]
impl ImageHost for ImgbbClient {
    fn provider_name(&self) -> &str {
        "imgbb"
    }

    async fn upload_base64(&self, encoded: &str, name: Option<&str>) -> AppResult<String> {
        if self.api_key.is_empty() {
            return Err(AppError::image_upload(
                "ImgBB upload failed: media.api_key is not configured",
            ));
        }

        let mut form = vec![("image", encoded)];
        if let Some(name) = name {
            form.push(("name", name));
        }

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::image_upload(format!("ImgBB upload failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::image_upload(format!("ImgBB upload failed: {e}")))?;
        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body);
            return Err(AppError::image_upload(format!(
                "ImgBB upload failed: status {status}: {detail}"
            )));
        }

        let url = parse_upload_response(&body)?;
        debug!(url = %url, bytes = encoded.len(), "Image hosted");
        Ok(url)
    }
}
