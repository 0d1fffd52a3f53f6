//! # estatehub-core
//!
//! Core crate for EstateHub. Contains the traits implemented by the
//! infrastructure crates (cache, image host, mailer), configuration
//! schemas, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other EstateHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
