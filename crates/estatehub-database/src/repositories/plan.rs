//! Plan catalog repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use estatehub_core::error::{AppError, ErrorKind};
use estatehub_core::result::AppResult;
use estatehub_entity::catalog::SubscriptionPlan;

use crate::store::PlanStore;

/// Repository for marketing plan entries.
#[derive(Debug, Clone)]
pub struct PlanRepository {
    pool: PgPool,
}

impl PlanRepository {
    /// Create a new plan repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanStore for PlanRepository {
    async fn find_all(&self) -> AppResult<Vec<SubscriptionPlan>> {
        sqlx::query_as::<_, SubscriptionPlan>(
            "SELECT * FROM subscription_plans ORDER BY monthly_price ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list plans", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        sqlx::query_as::<_, SubscriptionPlan>("SELECT * FROM subscription_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find plan", e))
    }

    async fn insert(&self, p: &SubscriptionPlan) -> AppResult<SubscriptionPlan> {
        sqlx::query_as::<_, SubscriptionPlan>(
            "INSERT INTO subscription_plans \
                 (id, name, description, monthly_price, yearly_price, max_listings, max_photos, \
                  validity_days, user_type, highlighted, features, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING *",
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.monthly_price)
        .bind(p.yearly_price)
        .bind(p.max_listings)
        .bind(p.max_photos)
        .bind(p.validity_days)
        .bind(p.user_type)
        .bind(p.highlighted)
        .bind(&p.features)
        .bind(p.created_at)
        .bind(p.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create plan", e))
    }

    async fn update(&self, p: &SubscriptionPlan) -> AppResult<SubscriptionPlan> {
        sqlx::query_as::<_, SubscriptionPlan>(
            "UPDATE subscription_plans SET name = $2, description = $3, monthly_price = $4, \
                 yearly_price = $5, max_listings = $6, max_photos = $7, validity_days = $8, \
                 user_type = $9, highlighted = $10, features = $11, updated_at = $12 \
             WHERE id = $1 RETURNING *",
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.monthly_price)
        .bind(p.yearly_price)
        .bind(p.max_listings)
        .bind(p.max_photos)
        .bind(p.validity_days)
        .bind(p.user_type)
        .bind(p.highlighted)
        .bind(&p.features)
        .bind(p.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update plan", e))?
        .ok_or_else(|| AppError::not_found("Plan not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete plan", e))
    }
}
