//! The subscription ledger: one record per user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use estatehub_core::{AppError, AppResult};
use estatehub_database::{SubscriptionStore, UserStore};
use estatehub_entity::subscription::{BillingCycle, PlanQuote, PlanTier, Subscription};
use estatehub_entity::user::UserSummary;

/// A subscription joined with its owner, when the owner still exists.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionWithUser {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub user: Option<UserSummary>,
}

/// Reads and transitions subscription records.
///
/// Every price and expiration goes through [`PlanTier::price`] and
/// [`BillingCycle::expiration_from`].
#[derive(Debug, Clone)]
pub struct SubscriptionLedger {
    subscriptions: Arc<dyn SubscriptionStore>,
    users: Arc<dyn UserStore>,
}

impl SubscriptionLedger {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            subscriptions,
            users,
        }
    }

    /// The published pricing table.
    pub fn plans(&self) -> Vec<PlanQuote> {
        PlanTier::ALL.iter().map(PlanTier::quote).collect()
    }

    /// The user's subscription if it is active and unexpired now.
    pub async fn get_active(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        self.get_active_at(user_id, Utc::now()).await
    }

    /// [`Self::get_active`] evaluated at `now`.
    pub async fn get_active_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .find_by_user(user_id)
            .await?
            .filter(|sub| sub.is_active_at(now)))
    }

    /// The user's record whatever its status.
    pub async fn get_any(&self, user_id: Uuid) -> AppResult<Option<Subscription>> {
        self.subscriptions.find_by_user(user_id).await
    }

    /// Start a subscription.
    ///
    /// Fails when the user already holds an active one. A lapsed or
    /// cancelled record is restarted in place.
    pub async fn create(
        &self,
        user_id: Uuid,
        plan: PlanTier,
        cycle: BillingCycle,
    ) -> AppResult<Subscription> {
        let now = Utc::now();
        let sub = match self.subscriptions.find_by_user(user_id).await? {
            Some(existing) if existing.is_active_at(now) => {
                return Err(AppError::duplicate_subscription(
                    "Active subscription already exists. Use PUT to update.",
                ));
            }
            Some(mut existing) => {
                existing.restart(plan, cycle, now);
                self.subscriptions.update(&existing).await?
            }
            None => {
                let fresh = Subscription::new(user_id, plan, cycle, now);
                let stored = self.subscriptions.insert_if_absent(&fresh).await?;
                if stored.id != fresh.id {
                    return Err(AppError::duplicate_subscription(
                        "Active subscription already exists. Use PUT to update.",
                    ));
                }
                stored
            }
        };

        info!(user_id = %user_id, plan = %plan, cycle = %cycle, "Subscription created");
        Ok(sub)
    }

    /// Move the user to another plan, restarting the period now.
    pub async fn change_plan(
        &self,
        user_id: Uuid,
        plan: PlanTier,
        cycle: BillingCycle,
    ) -> AppResult<Subscription> {
        let mut sub = self
            .subscriptions
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No subscription found"))?;

        sub.restart(plan, cycle, Utc::now());
        let sub = self.subscriptions.update(&sub).await?;

        info!(user_id = %user_id, plan = %plan, cycle = %cycle, "Subscription plan changed");
        Ok(sub)
    }

    /// Cancel the user's subscription. Cancelling again changes nothing.
    pub async fn cancel(&self, user_id: Uuid) -> AppResult<Subscription> {
        let mut sub = self
            .subscriptions
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("No subscription found"))?;

        if !sub.cancel(Utc::now()) {
            return Ok(sub);
        }
        let sub = self.subscriptions.update(&sub).await?;

        info!(user_id = %user_id, "Subscription cancelled");
        Ok(sub)
    }

    /// Return the user's record, provisioning the free default when none
    /// exists. Never touches an existing record.
    pub async fn ensure_subscription(&self, user_id: Uuid) -> AppResult<Subscription> {
        self.ensure_subscription_at(user_id, Utc::now()).await
    }

    /// [`Self::ensure_subscription`] evaluated at `now`.
    pub async fn ensure_subscription_at(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<Subscription> {
        if let Some(existing) = self.subscriptions.find_by_user(user_id).await? {
            return Ok(existing);
        }

        let fresh = Subscription::free_default(user_id, now);
        let stored = self.subscriptions.insert_if_absent(&fresh).await?;
        if stored.id == fresh.id {
            info!(user_id = %user_id, "Provisioned free subscription");
        }
        Ok(stored)
    }

    /// Every record with its owner's summary.
    pub async fn list_all_with_users(&self) -> AppResult<Vec<SubscriptionWithUser>> {
        let subscriptions = self.subscriptions.find_all().await?;
        let mut rows = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let user = self
                .users
                .find_by_id(subscription.user_id)
                .await?
                .map(|u| u.summary());
            rows.push(SubscriptionWithUser { subscription, user });
        }
        Ok(rows)
    }

    /// One record by id.
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Subscription> {
        self.subscriptions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Subscription not found"))
    }

    /// Hard-delete a record by id.
    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        if !self.subscriptions.delete(id).await? {
            return Err(AppError::not_found("Subscription not found"));
        }
        info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }
}
