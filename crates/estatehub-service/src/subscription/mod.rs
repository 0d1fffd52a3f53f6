//! Subscription bookkeeping and the listing quota.

pub mod ledger;
pub mod quota;

pub use ledger::{SubscriptionLedger, SubscriptionWithUser};
pub use quota::{QuotaGate, QuotaPermit};
