//! Subscription entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::plan::{BillingCycle, PlanTier};
use super::status::SubscriptionStatus;

/// Validity of an automatically provisioned free subscription.
pub const FREE_PLAN_VALIDITY_DAYS: i64 = 365;

/// A user's subscription. There is at most one record per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    /// Record identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Tier.
    pub plan: PlanTier,
    /// Billing cycle.
    pub billing_cycle: BillingCycle,
    /// Lifecycle state.
    pub status: SubscriptionStatus,
    /// Price for one billing period, taken from the pricing table.
    pub price: i32,
    /// Start of the current period.
    pub start_date: DateTime<Utc>,
    /// End of the current period, if any.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Whether the subscription renews on its own.
    pub auto_renew: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Start a new active subscription priced from the table.
    pub fn new(user_id: Uuid, plan: PlanTier, cycle: BillingCycle, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            plan,
            billing_cycle: cycle,
            status: SubscriptionStatus::Active,
            price: plan.price(cycle),
            start_date: now,
            expiration_date: Some(cycle.expiration_from(now)),
            auto_renew: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The subscription provisioned on a user's first listing attempt:
    /// free, monthly, valid for a year.
    pub fn free_default(user_id: Uuid, now: DateTime<Utc>) -> Self {
        let mut sub = Self::new(user_id, PlanTier::Free, BillingCycle::Monthly, now);
        sub.expiration_date = Some(now + Duration::days(FREE_PLAN_VALIDITY_DAYS));
        sub
    }

    /// Whether the expiration date has passed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp <= now)
    }

    /// Active status and not past expiration.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && !self.is_expired_at(now)
    }

    /// Restart the subscription on a (possibly different) plan.
    ///
    /// Resets the start date, recomputes price and expiration, and forces
    /// the status back to active.
    pub fn restart(&mut self, plan: PlanTier, cycle: BillingCycle, now: DateTime<Utc>) {
        self.plan = plan;
        self.billing_cycle = cycle;
        self.price = plan.price(cycle);
        self.start_date = now;
        self.expiration_date = Some(cycle.expiration_from(now));
        self.status = SubscriptionStatus::Active;
        self.updated_at = now;
    }

    /// Cancel. Returns `false` when the record was already cancelled, in
    /// which case nothing changes.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == SubscriptionStatus::Cancelled && !self.auto_renew {
            return false;
        }
        self.status = SubscriptionStatus::Cancelled;
        self.auto_renew = false;
        self.updated_at = now;
        true
    }
}
