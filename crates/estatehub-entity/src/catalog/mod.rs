//! Marketing plan catalog.

pub mod model;

pub use model::{CreateSubscriptionPlan, PlanAudience, SubscriptionPlan, UpdateSubscriptionPlan};
