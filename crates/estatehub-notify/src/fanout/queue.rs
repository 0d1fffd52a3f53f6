//! Request-side hand-off.

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use super::event::NewListingEvent;

/// Sender half of the fan-out channel. Cheap to clone.
#[derive(Debug, Clone)]
pub struct FanoutQueue {
    tx: mpsc::Sender<NewListingEvent>,
    enabled: bool,
}

impl FanoutQueue {
    pub fn new(tx: mpsc::Sender<NewListingEvent>, enabled: bool) -> Self {
        Self { tx, enabled }
    }

    /// Whether events are forwarded to the worker.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hand `event` to the worker without waiting.
    ///
    /// Returns whether the event was accepted. A full or closed queue
    /// drops the event; the caller's request is never affected.
    pub fn enqueue(&self, event: NewListingEvent) -> bool {
        if !self.enabled {
            debug!(listing_id = %event.listing_id, "Notifications disabled, dropping event");
            return false;
        }

        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(listing_id = %event.listing_id, "Fan-out queue full, dropping event");
                false
            }
            Err(TrySendError::Closed(event)) => {
                warn!(listing_id = %event.listing_id, "Fan-out worker stopped, dropping event");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn event() -> NewListingEvent {
        NewListingEvent {
            listing_id: Uuid::new_v4(),
            title: "Loft".into(),
            city: None,
            property_type: None,
            listing_type: None,
            price: None,
        }
    }

    #[tokio::test]
    async fn test_enqueue_delivers() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = FanoutQueue::new(tx, true);
        let ev = event();
        assert!(queue.enqueue(ev.clone()));
        assert_eq!(rx.recv().await, Some(ev));
    }

    #[tokio::test]
    async fn test_disabled_drops() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = FanoutQueue::new(tx, false);
        assert!(!queue.enqueue(event()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_drops() {
        let (tx, _rx) = mpsc::channel(1);
        let queue = FanoutQueue::new(tx, true);
        assert!(queue.enqueue(event()));
        assert!(!queue.enqueue(event()));
    }
}
