//! In-memory store implementations backed by `DashMap`.
//!
//! Used by `database.provider = "memory"` and throughout the test suites.
//! Uniqueness rules mirror the SQL schema: one user per email (ignoring
//! case) and one subscription per user.

mod listing;
mod plan;
mod subscription;
mod user;

pub use listing::MemoryListingStore;
pub use plan::MemoryPlanStore;
pub use subscription::MemorySubscriptionStore;
pub use user::MemoryUserStore;

fn newest_first<T>(mut rows: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}
