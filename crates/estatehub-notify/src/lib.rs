//! # estatehub-notify
//!
//! Outbound email and the new-listing announcement fan-out.
//!
//! Request handlers hand a [`NewListingEvent`] to the [`FanoutQueue`] and
//! return immediately. A detached [`FanoutWorker`] emails every registered
//! user and records the outcome in the [`ReportLog`].

pub mod fanout;
pub mod formatter;
pub mod mailer;

pub use fanout::{FanoutQueue, FanoutReport, FanoutWorker, NewListingEvent, ReportLog};
pub use mailer::build_mailer;
