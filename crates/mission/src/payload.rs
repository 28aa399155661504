//! In-process payload release mechanism.
//!
//! Behaves like the payload service: the mechanism starts unlocked, a release
//! only succeeds while unlocked, and once released it stays released.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::info;

use crate::collaborators::PayloadControl;
use crate::error::CollaboratorError;

#[derive(Debug, Default)]
struct Mechanism {
    locked: bool,
    released: bool,
}

/// Simulated payload release mechanism.
#[derive(Debug, Default)]
pub struct SimulatedPayload {
    mechanism: Mutex<Mechanism>,
}

impl SimulatedPayload {
    /// Create an unlocked, unreleased mechanism.
    pub fn new() -> Self {
        Self::default()
    }

    fn with<R>(&self, f: impl FnOnce(&mut Mechanism) -> R) -> R {
        f(&mut self.mechanism.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[async_trait]
impl PayloadControl for SimulatedPayload {
    async fn get_lock_status(&self) -> Result<bool, CollaboratorError> {
        Ok(self.with(|m| m.locked))
    }

    async fn has_released(&self) -> Result<bool, CollaboratorError> {
        Ok(self.with(|m| m.released))
    }

    async fn lock_release_mechanism(&self) -> Result<(), CollaboratorError> {
        self.with(|m| m.locked = true);
        info!("Release mechanism locked");
        Ok(())
    }

    async fn unlock_release_mechanism(&self) -> Result<(), CollaboratorError> {
        self.with(|m| m.locked = false);
        info!("Release mechanism unlocked");
        Ok(())
    }

    async fn release_payload(&self) -> Result<bool, CollaboratorError> {
        let released = self.with(|m| {
            if !m.locked {
                m.released = true;
            }
            m.released
        });
        info!(released, "Release requested");
        Ok(released)
    }
}
