//! Route handlers, one module per resource.

pub mod admin;
pub mod catalog;
pub mod health;
pub mod listing;
pub mod subscription;
pub mod user;
