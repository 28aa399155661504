//! Mission context and runtime task.
//!
//! [`MissionContext`] is the handle transport layers use to drive a mission.
//! [`MissionRuntime`] owns the single task that drains status reports and
//! runs the reconciler on a fixed interval.

use skydrop_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::collaborators::{AssuranceClient, PayloadControl, VehicleControl};
use crate::error::MissionError;
use crate::ingest::TelemetryIngest;
use crate::manager::{CommandOutcome, MissionManager};
use crate::reconciler::GatingReconciler;
use crate::status::{status_channel, StatusReceiver, StatusSender};
use crate::store::MissionStore;
use crate::types::{MissionParams, StatusReport};

/// Shared handle to a running mission.
#[derive(Clone)]
pub struct MissionContext {
    store: Arc<MissionStore>,
    manager: Arc<MissionManager>,
    status: StatusSender,
}

impl MissionContext {
    /// Wire a mission together. The returned runtime must be driven with
    /// [`MissionRuntime::run`] for status reports and ticks to take effect.
    pub fn new(
        config: &Config,
        assurance: Arc<dyn AssuranceClient>,
        vehicle: Arc<dyn VehicleControl>,
        payload: Arc<dyn PayloadControl>,
    ) -> (Self, MissionRuntime) {
        let store = Arc::new(MissionStore::new(config.mission.default_takeoff_altitude_m));
        let manager = Arc::new(MissionManager::new(Arc::clone(&store), Arc::clone(&vehicle)));
        let (status, status_rx) = status_channel(config.reconciler.status_queue_depth);

        let runtime = MissionRuntime {
            ingest: TelemetryIngest::new(Arc::clone(&store), Arc::clone(&vehicle)),
            reconciler: GatingReconciler::new(
                Arc::clone(&store),
                assurance,
                payload,
                vehicle,
                config.reconciler.clone(),
            ),
            status_rx,
            tick_interval: config.reconciler.tick_interval(),
        };

        (
            Self {
                store,
                manager,
                status,
            },
            runtime,
        )
    }

    /// Mission record.
    pub fn store(&self) -> &Arc<MissionStore> {
        &self.store
    }

    /// Command handlers.
    pub fn manager(&self) -> &Arc<MissionManager> {
        &self.manager
    }

    /// Producer side of the status queue.
    pub fn status_sender(&self) -> StatusSender {
        self.status.clone()
    }

    /// See [`MissionManager::set_mission_params`].
    pub async fn set_mission_params(&self, params: MissionParams) -> CommandOutcome {
        self.manager.set_mission_params(params).await
    }

    /// See [`MissionManager::clear_mission_params`].
    pub async fn clear_mission_params(&self) -> CommandOutcome {
        self.manager.clear_mission_params().await
    }

    /// See [`MissionManager::take_off`].
    pub async fn take_off(&self) -> CommandOutcome {
        self.manager.take_off().await
    }

    /// See [`MissionManager::abort`].
    pub async fn abort(&self) -> CommandOutcome {
        self.manager.abort().await
    }

    /// Queue a vehicle status report for ingest.
    pub async fn save_status(&self, report: StatusReport) -> Result<(), MissionError> {
        self.status.save_status(report).await
    }
}

/// Single task that serialises ingest and reconciliation.
pub struct MissionRuntime {
    ingest: TelemetryIngest,
    reconciler: GatingReconciler,
    status_rx: StatusReceiver,
    tick_interval: Duration,
}

impl MissionRuntime {
    /// Run until `shutdown` flips to `true` or every status sender is gone.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        self.reconciler.prime().await;

        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(tick_ms = self.tick_interval.as_millis() as u64, "Mission runtime started");

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                report = self.status_rx.recv() => match report {
                    Some(report) => {
                        let outcome = self.ingest.apply(report).await;
                        debug!(phase = ?outcome.phase, follow_up = ?outcome.follow_up, "Status applied");
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    let outcome = self.reconciler.tick().await;
                    debug!(?outcome, "Reconciler tick");
                }
            }
        }

        info!("Mission runtime stopped");
    }
}
