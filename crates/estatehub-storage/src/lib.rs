//! # estatehub-storage
//!
//! Where listing images live before and after ingestion: a local staging
//! area for multipart uploads and the remote image host that turns image
//! bytes into public URLs.

pub mod manager;
pub mod providers;
pub mod staging;

pub use manager::build_image_host;
pub use staging::{StagedUpload, UploadStaging};
