//! # estatehub-entity
//!
//! Domain entity models for EstateHub. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod catalog;
pub mod listing;
pub mod patch;
pub mod subscription;
pub mod user;

pub use patch::Patch;
