//! Gating reconciler
//!
//! Periodic decision loop that unlocks the release mechanism near the
//! destination and releases the payload once on arrival. Monitor verdicts are
//! reported and logged but do not gate the release.

use serde::{Deserialize, Serialize};
use skydrop_core::ReconcilerConfig;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::collaborators::{AssuranceClient, PayloadControl, VehicleControl};
use crate::store::MissionStore;
use crate::types::{LockLatch, MissionPhase};

/// Monitor action reported on arrival.
pub const AT_DESTINATION_ACTION: &str = "at_destination";

/// Monitor action reported after the drop.
pub const DROP_SUPPLIES_ACTION: &str = "drop_supplies";

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Nothing to do in the current phase
    Idle,
    /// Reported arrival to the monitor
    ReportedArrival {
        /// Whether this tick released the payload
        released: bool,
    },
    /// Reported the drop to the monitor
    ReportedDrop,
    /// Unlocked the release mechanism
    Unlocked,
}

/// Periodic gating decision loop.
pub struct GatingReconciler {
    store: Arc<MissionStore>,
    assurance: Arc<dyn AssuranceClient>,
    payload: Arc<dyn PayloadControl>,
    vehicle: Arc<dyn VehicleControl>,
    config: ReconcilerConfig,
    subscribed: bool,
}

impl GatingReconciler {
    /// Create a reconciler. Call [`prime`](Self::prime) before the first tick.
    pub fn new(
        store: Arc<MissionStore>,
        assurance: Arc<dyn AssuranceClient>,
        payload: Arc<dyn PayloadControl>,
        vehicle: Arc<dyn VehicleControl>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            assurance,
            payload,
            vehicle,
            config,
            subscribed: false,
        }
    }

    /// Whether the telemetry subscription has been confirmed.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Lock the release mechanism and request telemetry.
    pub async fn prime(&mut self) {
        if let Err(err) = self.payload.lock_release_mechanism().await {
            error!(error = %err, "Failed to lock release mechanism at start-up");
        }
        self.subscribe().await;
    }

    /// Run one reconciliation pass.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.subscribed {
            self.subscribe().await;
        }

        self.store
            .advance_elapsed(self.config.tick_interval().as_secs_f64());
        let snapshot = self.store.snapshot();

        match snapshot.phase {
            MissionPhase::AtDestination => {
                self.report(AT_DESTINATION_ACTION).await;
                let released = snapshot.lock == LockLatch::Unlocked
                    && !snapshot.released
                    && self.release().await;
                TickOutcome::ReportedArrival { released }
            }
            MissionPhase::DropSupplies => {
                self.report(DROP_SUPPLIES_ACTION).await;
                TickOutcome::ReportedDrop
            }
            MissionPhase::FlyingToDestination if !snapshot.released => {
                let near = snapshot.telemetry.position.is_near(
                    &snapshot.destination.position,
                    self.config.proximity_threshold_deg,
                );
                if near && snapshot.lock == LockLatch::Locked {
                    self.unlock().await;
                    TickOutcome::Unlocked
                } else {
                    TickOutcome::Idle
                }
            }
            _ => TickOutcome::Idle,
        }
    }

    async fn subscribe(&mut self) {
        match self
            .vehicle
            .subscribe_status(self.config.status_period_ms)
            .await
        {
            Ok(()) => {
                debug!(period_ms = self.config.status_period_ms, "Subscribed to vehicle status");
                self.subscribed = true;
            }
            Err(err) => {
                warn!(error = %err, "Status subscription failed, retrying next tick");
                self.subscribed = false;
            }
        }
    }

    async fn report(&self, action: &str) {
        match self.assurance.check_state(action).await {
            Ok(true) => debug!(action, "Monitor verdict ok"),
            Ok(false) => warn!(action, "Monitor reports a violation"),
            Err(err) => error!(action, error = %err, "Assurance broker call failed"),
        }
    }

    async fn release(&self) -> bool {
        if !self.store.claim_release() {
            return false;
        }
        warn!("*** RELEASING PAYLOAD ***");
        match self.payload.release_payload().await {
            Ok(true) => {}
            Ok(false) => warn!("Payload reported not released"),
            Err(err) => error!(error = %err, "Release command failed"),
        }
        if let Err(err) = self.payload.lock_release_mechanism().await {
            error!(error = %err, "Failed to re-lock release mechanism");
        }
        true
    }

    async fn unlock(&self) {
        warn!("*** UNLOCKING RELEASE MECHANISM ***");
        if let Err(err) = self.payload.unlock_release_mechanism().await {
            error!(error = %err, "Unlock command failed");
        }
        self.store.set_lock_latch(LockLatch::Unlocked);
    }
}
