//! Outcome records of finished fan-outs.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One recipient that could not be reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub email: String,
    pub reason: String,
}

/// Aggregate result of announcing one listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanoutReport {
    pub listing_id: Uuid,
    pub title: String,
    /// Messages accepted by the mailer.
    pub success: usize,
    /// Recipients attempted.
    pub total: usize,
    pub failures: Vec<DeliveryFailure>,
    pub completed_at: DateTime<Utc>,
}

/// Bounded, newest-last history of reports.
#[derive(Debug)]
pub struct ReportLog {
    capacity: usize,
    entries: RwLock<VecDeque<FanoutReport>>,
}

impl ReportLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a report, evicting the oldest when full.
    pub async fn record(&self, report: FanoutReport) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(report);
    }

    /// Retained reports, newest first.
    pub async fn recent(&self) -> Vec<FanoutReport> {
        self.entries.read().await.iter().rev().cloned().collect()
    }
}
