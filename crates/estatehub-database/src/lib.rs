//! # estatehub-database
//!
//! PostgreSQL connection management, the store traits the service layer
//! depends on, and two implementations of them: sqlx repositories and a
//! process-local in-memory backend.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{ListingStore, PlanStore, Stores, SubscriptionStore, UserStore};
