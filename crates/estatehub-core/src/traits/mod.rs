//! Core traits defined in `estatehub-core` and implemented by other crates.

pub mod cache;
pub mod image_host;
pub mod mailer;

pub use cache::CacheProvider;
pub use image_host::ImageHost;
pub use mailer::{EmailMessage, Mailer};
