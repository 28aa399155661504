//! Mission error types

use thiserror::Error;

/// Errors surfaced by the mission context.
#[derive(Debug, Error)]
pub enum MissionError {
    /// Status queue is at capacity
    #[error("Status queue full (capacity {capacity})")]
    StatusQueueFull {
        /// Queue capacity
        capacity: usize,
    },

    /// Mission runtime has stopped consuming status reports
    #[error("Status queue closed")]
    StatusQueueClosed,
}

/// Failure of a call to an external collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Collaborator could not be reached
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        /// Collaborator name
        service: &'static str,
        /// Transport-level reason
        reason: String,
    },

    /// Collaborator answered with an error
    #[error("{service} rejected {call}: {reason}")]
    Rejected {
        /// Collaborator name
        service: &'static str,
        /// Operation that was rejected
        call: &'static str,
        /// Reason given by the collaborator
        reason: String,
    },
}
