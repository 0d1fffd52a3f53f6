//! Listing quota enforcement.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_database::ListingStore;
use estatehub_entity::subscription::{ListingCap, Subscription, SubscriptionStatus};

use super::ledger::SubscriptionLedger;

/// Proof that the user may create one more listing.
///
/// Holds the user's creation lock; create paths keep it alive until the
/// listing is persisted, so two concurrent requests from one user cannot
/// both pass the gate on the same count within this process.
#[derive(Debug)]
pub struct QuotaPermit {
    pub subscription: Subscription,
    _guard: OwnedMutexGuard<()>,
}

/// Decides whether a user may create another listing.
#[derive(Debug, Clone)]
pub struct QuotaGate {
    ledger: SubscriptionLedger,
    listings: Arc<dyn ListingStore>,
    locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl QuotaGate {
    pub fn new(ledger: SubscriptionLedger, listings: Arc<dyn ListingStore>) -> Self {
        Self {
            ledger,
            listings,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Admit one listing creation for `user_id`.
    pub async fn admit(&self, user_id: Uuid) -> AppResult<QuotaPermit> {
        self.admit_at(user_id, Utc::now()).await
    }

    /// [`Self::admit`] evaluated at `now`.
    pub async fn admit_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<QuotaPermit> {
        let lock = self.locks.entry(user_id).or_default().clone();
        let guard = lock.lock_owned().await;

        let subscription = self.resolve_subscription(user_id, now).await?;

        let plan = subscription.plan;
        if let ListingCap::Limited(cap) = plan.listing_cap() {
            let count = self.listings.count_by_user(user_id).await?;
            if !plan.listing_cap().allows_another(count) {
                info!(user_id = %user_id, plan = %plan, count, cap, "Listing quota reached");
                return Err(AppError::quota_exceeded(format!(
                    "You have reached the maximum number of listings ({cap}) for your {plan} plan. \
                     Please upgrade your subscription to add more listings."
                )));
            }
        }

        debug!(user_id = %user_id, plan = %plan, "Listing quota check passed");
        Ok(QuotaPermit {
            subscription,
            _guard: guard,
        })
    }

    async fn resolve_subscription(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Subscription> {
        if let Some(active) = self.ledger.get_active_at(user_id, now).await? {
            return Ok(active);
        }

        match self.ledger.get_any(user_id).await? {
            None => self.ledger.ensure_subscription_at(user_id, now).await,
            Some(sub) if sub.status != SubscriptionStatus::Active => {
                Err(AppError::subscription_inactive(format!(
                    "Your subscription is {}. Please renew your subscription to create listings.",
                    sub.status
                )))
            }
            Some(_) => Err(AppError::subscription_expired(
                "Your subscription has expired. Please renew your subscription to create listings.",
            )),
        }
    }
}
