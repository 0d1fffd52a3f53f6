//! Plan catalog CRUD. Reads are public, writes are admin only.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_database::PlanStore;
use estatehub_entity::catalog::{CreateSubscriptionPlan, SubscriptionPlan, UpdateSubscriptionPlan};

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct PlanCatalogService {
    plans: Arc<dyn PlanStore>,
}

impl PlanCatalogService {
    pub fn new(plans: Arc<dyn PlanStore>) -> Self {
        Self { plans }
    }

    pub async fn list(&self) -> AppResult<Vec<SubscriptionPlan>> {
        self.plans.find_all().await
    }

    pub async fn get(&self, id: Uuid) -> AppResult<SubscriptionPlan> {
        self.plans
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Plan not found"))
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateSubscriptionPlan,
    ) -> AppResult<SubscriptionPlan> {
        ctx.require_admin()?;
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Plan name is required"));
        }
        validate_prices(input.monthly_price, input.yearly_price)?;

        let plan = self.plans.insert(&SubscriptionPlan::new(input)).await?;
        info!(plan_id = %plan.id, name = %plan.name, "Catalog plan created");
        Ok(plan)
    }

    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        update: UpdateSubscriptionPlan,
    ) -> AppResult<SubscriptionPlan> {
        ctx.require_admin()?;
        let mut plan = self.get(id).await?;
        plan.apply(update);
        validate_prices(plan.monthly_price, plan.yearly_price)?;

        let plan = self.plans.update(&plan).await?;
        info!(plan_id = %id, "Catalog plan updated");
        Ok(plan)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        ctx.require_admin()?;
        if !self.plans.delete(id).await? {
            return Err(AppError::not_found("Plan not found"));
        }
        info!(plan_id = %id, "Catalog plan deleted");
        Ok(())
    }
}

fn validate_prices(monthly: f64, yearly: f64) -> AppResult<()> {
    if monthly < 0.0 || yearly < 0.0 {
        return Err(AppError::validation("Prices cannot be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use estatehub_core::ErrorKind;
    use estatehub_database::memory::MemoryPlanStore;
    use estatehub_entity::catalog::PlanAudience;
    use estatehub_entity::user::{UserRole, UserSummary};

    fn ctx(role: UserRole) -> RequestContext {
        RequestContext::new(UserSummary {
            id: Uuid::new_v4(),
            name: "Root".into(),
            email: "root@example.com".into(),
            role,
        })
    }

    fn premium() -> CreateSubscriptionPlan {
        CreateSubscriptionPlan {
            name: "Premium".into(),
            description: None,
            monthly_price: 49.0,
            yearly_price: 499.0,
            max_listings: 20,
            max_photos: 15,
            validity_days: 30,
            user_type: PlanAudience::Both,
            highlighted: true,
            features: vec!["Featured placement".into()],
        }
    }

    #[tokio::test]
    async fn test_admin_manages_catalog() {
        let svc = PlanCatalogService::new(Arc::new(MemoryPlanStore::new()));
        let admin = ctx(UserRole::Admin);

        let plan = svc.create(&admin, premium()).await.unwrap();
        let update = UpdateSubscriptionPlan {
            max_photos: Some(25),
            ..Default::default()
        };
        let plan = svc.update(&admin, plan.id, update).await.unwrap();
        assert_eq!(plan.max_photos, 25);
        assert_eq!(svc.list().await.unwrap().len(), 1);

        svc.delete(&admin, plan.id).await.unwrap();
        assert_eq!(svc.get(plan.id).await.unwrap_err().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_write() {
        let svc = PlanCatalogService::new(Arc::new(MemoryPlanStore::new()));
        let err = svc.create(&ctx(UserRole::Realtor), premium()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
