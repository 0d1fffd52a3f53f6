//! # estatehub-cache
//!
//! Cache provider implementations for EstateHub:
//!
//! - **memory**: in-process cache using [moka](https://crates.io/crates/moka)
//!   with a TTL per entry
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime from `cache.provider`.

pub mod json;
pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use json::CacheJsonExt;
pub use provider::CacheManager;
