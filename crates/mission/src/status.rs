//! Bounded status report queue.
//!
//! Transport handlers push reports; the mission runtime is the only consumer,
//! so telemetry ingest never runs concurrently with the reconciler.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::MissionError;
use crate::types::StatusReport;

/// Producer side of the status queue.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: mpsc::Sender<StatusReport>,
    capacity: usize,
}

/// Consumer side of the status queue.
pub type StatusReceiver = mpsc::Receiver<StatusReport>;

/// Create a status queue holding at most `capacity` pending reports.
pub fn status_channel(capacity: usize) -> (StatusSender, StatusReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = mpsc::channel(capacity);
    (StatusSender { tx, capacity }, rx)
}

impl StatusSender {
    /// Queue a report, waiting for space if the queue is full.
    pub async fn save_status(&self, report: StatusReport) -> Result<(), MissionError> {
        self.tx
            .send(report)
            .await
            .map_err(|_| MissionError::StatusQueueClosed)
    }

    /// Queue a report without waiting.
    pub fn try_save_status(&self, report: StatusReport) -> Result<(), MissionError> {
        self.tx.try_send(report).map_err(|err| match err {
            TrySendError::Full(_) => MissionError::StatusQueueFull {
                capacity: self.capacity,
            },
            TrySendError::Closed(_) => MissionError::StatusQueueClosed,
        })
    }
}
