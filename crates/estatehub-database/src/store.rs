//! Persistence seams used by the service layer.
//!
//! Each store has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`]. [`Stores`] bundles one of
//! each kind, selected by `database.provider`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use estatehub_core::config::DatabaseConfig;
use estatehub_core::{AppError, AppResult};
use estatehub_entity::catalog::SubscriptionPlan;
use estatehub_entity::listing::{Listing, ListingQuery};
use estatehub_entity::subscription::Subscription;
use estatehub_entity::user::User;

use crate::connection::DatabasePool;
use crate::memory::{MemoryListingStore, MemoryPlanStore, MemorySubscriptionStore, MemoryUserStore};
use crate::migration::run_migrations;
use crate::repositories::{
    ListingRepository, PlanRepository, SubscriptionRepository, UserRepository,
};

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Find a user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Every user, newest first.
    async fn find_all(&self) -> AppResult<Vec<User>>;
    /// Insert a new user. A taken email is a conflict.
    async fn insert(&self, user: &User) -> AppResult<User>;
    /// Persist changes to an existing user.
    async fn update(&self, user: &User) -> AppResult<User>;
    /// Delete a user. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Subscription records, at most one per user.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug {
    /// The record for `user_id` whatever its status.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>>;
    /// Find a record by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>>;
    /// Every record, newest first.
    async fn find_all(&self) -> AppResult<Vec<Subscription>>;
    /// Insert `sub` unless the user already has a record, and return
    /// whichever record the user holds afterwards.
    async fn insert_if_absent(&self, sub: &Subscription) -> AppResult<Subscription>;
    /// Overwrite the record with the same id.
    async fn update(&self, sub: &Subscription) -> AppResult<Subscription>;
    /// Delete a record. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Listing records.
#[async_trait]
pub trait ListingStore: Send + Sync + std::fmt::Debug {
    /// Find a listing by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;
    /// Listings matching `query`, newest first, one page.
    async fn find(&self, query: &ListingQuery) -> AppResult<Vec<Listing>>;
    /// Number of listings owned by `user_id`, any status.
    async fn count_by_user(&self, user_id: Uuid) -> AppResult<u64>;
    /// Insert a new listing.
    async fn insert(&self, listing: &Listing) -> AppResult<Listing>;
    /// Persist changes to an existing listing.
    async fn update(&self, listing: &Listing) -> AppResult<Listing>;
    /// Delete a listing. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Plan catalog entries.
#[async_trait]
pub trait PlanStore: Send + Sync + std::fmt::Debug {
    async fn find_all(&self) -> AppResult<Vec<SubscriptionPlan>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>>;
    async fn insert(&self, plan: &SubscriptionPlan) -> AppResult<SubscriptionPlan>;
    async fn update(&self, plan: &SubscriptionPlan) -> AppResult<SubscriptionPlan>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// One implementation of every store.
#[derive(Debug, Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub listings: Arc<dyn ListingStore>,
    pub plans: Arc<dyn PlanStore>,
    /// The pool backing the stores, absent for the in-memory backend.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            subscriptions: Arc::new(SubscriptionRepository::new(pg.clone())),
            listings: Arc::new(ListingRepository::new(pg.clone())),
            plans: Arc::new(PlanRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Process-local stores. Data is lost on exit.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            subscriptions: Arc::new(MemorySubscriptionStore::new()),
            listings: Arc::new(MemoryListingStore::new()),
            plans: Arc::new(MemoryPlanStore::new()),
            pool: None,
        }
    }

    /// Build the stores named by `config.provider`, connecting and
    /// migrating when it is `postgres`.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Using in-memory stores");
                Ok(Self::in_memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Expected one of: postgres, memory"
            ))),
        }
    }

    /// Report backend connectivity.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
