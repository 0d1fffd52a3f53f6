//! Identities resolved from token subjects.

pub mod cache;

pub use cache::IdentityCache;
