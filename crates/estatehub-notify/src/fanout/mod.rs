//! New-listing announcement fan-out.
//!
//! [`FanoutQueue`] is the request-side handle; [`FanoutWorker`] owns the
//! receiving end and runs detached from any request.

pub mod event;
pub mod queue;
pub mod report;
pub mod worker;

use std::sync::Arc;

use tokio::sync::mpsc;

use estatehub_core::config::NotificationsConfig;
use estatehub_core::traits::Mailer;
use estatehub_database::UserStore;

pub use event::NewListingEvent;
pub use queue::FanoutQueue;
pub use report::{FanoutReport, ReportLog};
pub use worker::FanoutWorker;

/// Build a connected queue, worker and report log.
///
/// The worker still has to be spawned with [`FanoutWorker::run`].
pub fn channel(
    config: &NotificationsConfig,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
) -> (FanoutQueue, FanoutWorker, Arc<ReportLog>) {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let reports = Arc::new(ReportLog::new(config.report_history));
    let queue = FanoutQueue::new(tx, config.enabled);
    let worker = FanoutWorker::new(rx, users, mailer, Arc::clone(&reports));
    (queue, worker, reports)
}
