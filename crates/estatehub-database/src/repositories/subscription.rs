//! Subscription repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use estatehub_core::error::{AppError, ErrorKind};
use estatehub_core::result::AppResult;
use estatehub_entity::subscription::Subscription;

use crate::store::SubscriptionStore;

/// Repository for the one-per-user subscription records.
#[derive(Debug, Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    /// Create a new subscription repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find subscription by user", e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find subscription", e)
            })
    }

    async fn find_all(&self) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list subscriptions", e)
            })
    }

    async fn insert_if_absent(&self, sub: &Subscription) -> AppResult<Subscription> {
        sqlx::query(
            "INSERT INTO subscriptions \
                 (id, user_id, plan, billing_cycle, status, price, start_date, \
                  expiration_date, auto_renew, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(sub.id)
        .bind(sub.user_id)
        .bind(sub.plan)
        .bind(sub.billing_cycle)
        .bind(sub.status)
        .bind(sub.price)
        .bind(sub.start_date)
        .bind(sub.expiration_date)
        .bind(sub.auto_renew)
        .bind(sub.created_at)
        .bind(sub.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create subscription", e)
        })?;

        self.find_by_user(sub.user_id).await?.ok_or_else(|| {
            AppError::database(format!(
                "Subscription for user {} vanished after insert",
                sub.user_id
            ))
        })
    }

    async fn update(&self, sub: &Subscription) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            "UPDATE subscriptions SET plan = $2, billing_cycle = $3, status = $4, price = $5, \
                                      start_date = $6, expiration_date = $7, auto_renew = $8, \
                                      updated_at = $9 \
             WHERE id = $1 RETURNING *",
        )
        .bind(sub.id)
        .bind(sub.plan)
        .bind(sub.billing_cycle)
        .bind(sub.status)
        .bind(sub.price)
        .bind(sub.start_date)
        .bind(sub.expiration_date)
        .bind(sub.auto_renew)
        .bind(sub.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update subscription", e)
        })?
        .ok_or_else(|| AppError::not_found("No subscription found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete subscription", e)
            })
    }
}
