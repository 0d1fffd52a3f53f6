//! Detached worker that emails every user about a new listing.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use estatehub_core::traits::Mailer;
use estatehub_database::UserStore;

use super::event::NewListingEvent;
use super::report::{DeliveryFailure, FanoutReport, ReportLog};
use crate::formatter::new_listing_email;

/// Consumes [`NewListingEvent`]s until cancelled or the queue closes.
#[derive(Debug)]
pub struct FanoutWorker {
    rx: mpsc::Receiver<NewListingEvent>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    reports: Arc<ReportLog>,
}

impl FanoutWorker {
    pub fn new(
        rx: mpsc::Receiver<NewListingEvent>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        reports: Arc<ReportLog>,
    ) -> Self {
        Self {
            rx,
            users,
            mailer,
            reports,
        }
    }

    /// Run until the cancel signal flips to `true` or every sender is gone.
    pub async fn run(mut self, mut cancel: watch::Receiver<bool>) {
        info!(mailer = self.mailer.provider_name(), "Notification fan-out worker started");

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Notification fan-out worker received shutdown signal");
                        self.drain().await;
                        break;
                    }
                }
                event = self.rx.recv() => {
                    let Some(event) = event else {
                        info!("Fan-out queue closed");
                        break;
                    };
                    let report = Self::process(&*self.users, &*self.mailer, event).await;
                    self.reports.record(report).await;
                }
            }
        }

        info!("Notification fan-out worker shut down complete");
    }

    /// Stop accepting events and deliver the ones already queued.
    async fn drain(&mut self) {
        self.rx.close();
        let mut drained = 0usize;
        while let Ok(event) = self.rx.try_recv() {
            let report = Self::process(&*self.users, &*self.mailer, event).await;
            self.reports.record(report).await;
            drained += 1;
        }
        if drained > 0 {
            info!(drained, "Delivered queued announcements before shutdown");
        }
    }

    /// Announce one listing to every registered user.
    ///
    /// Per-recipient failures are logged and collected, never returned.
    pub async fn process(
        users: &dyn UserStore,
        mailer: &dyn Mailer,
        event: NewListingEvent,
    ) -> FanoutReport {
        let recipients = match users.find_all().await {
            Ok(users) => users,
            Err(e) => {
                error!(listing_id = %event.listing_id, "Failed to load recipients: {}", e);
                Vec::new()
            }
        };

        let sends = recipients.iter().map(|user| {
            let message = new_listing_email(&user.name, &user.email, &event);
            async move {
                let outcome = mailer.send(&message).await;
                (message.to, outcome)
            }
        });
        let outcomes = join_all(sends).await;

        let total = outcomes.len();
        let mut failures = Vec::new();
        for (email, outcome) in outcomes {
            if let Err(e) = outcome {
                warn!(listing_id = %event.listing_id, to = %email, "Announcement not delivered: {}", e);
                failures.push(DeliveryFailure {
                    email,
                    reason: e.message,
                });
            }
        }
        let success = total - failures.len();

        info!(
            listing_id = %event.listing_id,
            success,
            total,
            "New listing announced"
        );

        FanoutReport {
            listing_id: event.listing_id,
            title: event.title,
            success,
            total,
            failures,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use uuid::Uuid;

    use estatehub_core::traits::EmailMessage;
    use estatehub_core::{AppError, AppResult};
    use estatehub_database::memory::MemoryUserStore;
    use estatehub_entity::user::{CreateUser, User, UserRole};

    #[derive(Debug)]
    struct RejectingMailer {
        reject: &'static str,
        sent: tokio::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Mailer for RejectingMailer {
        fn provider_name(&self) -> &str {
            "test"
        }

        async fn send(&self, message: &EmailMessage) -> AppResult<()> {
            if message.to == self.reject {
                return Err(AppError::external("mailbox unavailable"));
            }
            self.sent.lock().await.push(message.to.clone());
            Ok(())
        }
    }

    async fn seed(store: &MemoryUserStore, email: &str) {
        let user = User::new(CreateUser {
            email: email.into(),
            name: "Someone".into(),
            password_hash: "hash".into(),
            role: UserRole::Owner,
        });
        store.insert(&user).await.unwrap();
    }

    fn event() -> NewListingEvent {
        NewListingEvent {
            listing_id: Uuid::new_v4(),
            title: "Beach house".into(),
            city: Some("Miami".into()),
            property_type: Some("House".into()),
            listing_type: Some("Sale".into()),
            price: Some(420_000.0),
        }
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_raised() {
        let users = MemoryUserStore::new();
        seed(&users, "a@example.com").await;
        seed(&users, "b@example.com").await;
        seed(&users, "c@example.com").await;
        let mailer = RejectingMailer {
            reject: "b@example.com",
            sent: Default::default(),
        };

        let report = FanoutWorker::process(&users, &mailer, event()).await;
        assert_eq!(report.total, 3);
        assert_eq!(report.success, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].email, "b@example.com");
        assert_eq!(mailer.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_worker_records_reports_until_cancelled() {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let mailer: Arc<dyn Mailer> = Arc::new(RejectingMailer {
            reject: "",
            sent: Default::default(),
        });
        let config = estatehub_core::config::NotificationsConfig::default();
        let (queue, worker, reports) = super::super::channel(&config, users, mailer);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(worker.run(cancel_rx));

        assert!(queue.enqueue(event()));
        drop(queue);
        handle.await.unwrap();

        let recent = reports.recent().await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].total, 0);
        drop(cancel_tx);
    }

    #[tokio::test]
    async fn test_shutdown_delivers_queued_events() {
        let store = MemoryUserStore::new();
        seed(&store, "a@example.com").await;
        let users: Arc<dyn UserStore> = Arc::new(store);
        let mailer = Arc::new(RejectingMailer {
            reject: "",
            sent: Default::default(),
        });
        let config = estatehub_core::config::NotificationsConfig::default();
        let (queue, worker, reports) = super::super::channel(&config, users, mailer.clone());

        assert!(queue.enqueue(event()));
        assert!(queue.enqueue(event()));
        assert!(queue.enqueue(event()));

        let (cancel_tx, cancel_rx) = watch::channel(false);
        cancel_tx.send(true).unwrap();
        worker.run(cancel_rx).await;

        assert_eq!(reports.recent().await.len(), 3);
        assert_eq!(mailer.sent.lock().await.len(), 3);
        assert!(!queue.enqueue(event()));
    }
}
