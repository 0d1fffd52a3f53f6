use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_entity::subscription::Subscription;

use super::newest_first;
use crate::store::SubscriptionStore;

/// Subscriptions keyed by user id.
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    by_user: DashMap<Uuid, Subscription>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self.by_user.get(&user_id).map(|s| s.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .by_user
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<Subscription>> {
        let rows = self.by_user.iter().map(|s| s.clone()).collect();
        Ok(newest_first(rows, |s: &Subscription| s.created_at))
    }

    async fn insert_if_absent(&self, sub: &Subscription) -> AppResult<Subscription> {
        Ok(self
            .by_user
            .entry(sub.user_id)
            .or_insert_with(|| sub.clone())
            .clone())
    }

    async fn update(&self, sub: &Subscription) -> AppResult<Subscription> {
        match self.by_user.get_mut(&sub.user_id) {
            Some(mut current) if current.id == sub.id => {
                *current = sub.clone();
                Ok(sub.clone())
            }
            _ => Err(AppError::not_found("No subscription found")),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let user_id = self.by_user.iter().find(|s| s.id == id).map(|s| s.user_id);
        Ok(match user_id {
            Some(user_id) => self.by_user.remove(&user_id).is_some(),
            None => false,
        })
    }
}
