use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::catalog::SubscriptionPlan;

use crate::store::PlanStore;

/// Catalog entries keyed by id.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    plans: DashMap<Uuid, SubscriptionPlan>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn find_all(&self) -> AppResult<Vec<SubscriptionPlan>> {
        let mut plans: Vec<_> = self.plans.iter().map(|p| p.clone()).collect();
        plans.sort_by(|a, b| {
            a.monthly_price
                .total_cmp(&b.monthly_price)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(plans)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SubscriptionPlan>> {
        Ok(self.plans.get(&id).map(|p| p.clone()))
    }

    async fn insert(&self, plan: &SubscriptionPlan) -> AppResult<SubscriptionPlan> {
        self.plans.insert(plan.id, plan.clone());
        Ok(plan.clone())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> AppResult<SubscriptionPlan> {
        match self.plans.get_mut(&plan.id) {
            Some(mut current) => {
                *current = plan.clone();
                Ok(plan.clone())
            }
            None => Err(AppError::not_found("Plan not found")),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.plans.remove(&id).is_some())
    }
}
