//! PostgreSQL repository implementations.

pub mod listing;
pub mod plan;
pub mod subscription;
pub mod user;

pub use listing::ListingRepository;
pub use plan::PlanRepository;
pub use subscription::SubscriptionRepository;
pub use user::UserRepository;
