//! Image hosting and upload staging configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the image ingestion path.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Image host provider. Only `"imgbb"` is supported.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Upload endpoint of the image host.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for the image host. Uploads fail while this is empty.
    #[serde(default)]
    pub api_key: String,
    /// Directory where multipart uploads are staged before hosting.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum number of uploaded files per listing request.
    #[serde(default = "default_max_files")]
    #[validate(range(min = 1, max = 50))]
    pub max_files: usize,
    /// Strings longer than this that do not look like URLs are treated as
    /// inline base64 images.
    #[serde(default = "default_inline_threshold")]
    pub inline_threshold: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            upload_dir: default_upload_dir(),
            max_files: default_max_files(),
            inline_threshold: default_inline_threshold(),
        }
    }
}

fn default_provider() -> String {
    "imgbb".to_string()
}

fn default_endpoint() -> String {
    "https://api.imgbb.com/1/upload".to_string()
}

fn default_upload_dir() -> String {
    "./data/uploads".to_string()
}

fn default_max_files() -> usize {
    10
}

fn default_inline_threshold() -> usize {
    100
}
