//! # estatehub-service
//!
//! Business logic service layer for EstateHub. Each service orchestrates
//! the stores, the image host, the identity cache and the notification
//! queue to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod catalog;
pub mod context;
pub mod listing;
pub mod media;
pub mod subscription;
pub mod user;

pub use catalog::PlanCatalogService;
pub use context::RequestContext;
pub use listing::ListingService;
pub use media::ImageIngestor;
pub use subscription::{QuotaGate, QuotaPermit, SubscriptionLedger};
pub use user::{AuthSession, UserService};
