//! Subscription domain entities and the static pricing table.

pub mod model;
pub mod plan;
pub mod status;

pub use model::{FREE_PLAN_VALIDITY_DAYS, Subscription};
pub use plan::{BillingCycle, ListingCap, PlanQuote, PlanTier};
pub use status::SubscriptionStatus;
