//! Ground-station command handlers.
//!
//! Out-of-phase commands are ignored and logged; callers never see an error.
//! Each handler decides and applies its phase change under the store lock
//! before any vehicle command is sent, so concurrent commands cannot both
//! take effect.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::collaborators::{VehicleControl, Waypoint};
use crate::store::MissionStore;
use crate::types::{Destination, LatLon, MissionParams, MissionPhase};

/// Whether a command changed mission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The command took effect
    Applied,
    /// The command was not valid in the current phase
    Ignored {
        /// Phase the command arrived in
        phase: MissionPhase,
    },
}

impl CommandOutcome {
    /// True when the command took effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

/// Mission command handlers.
pub struct MissionManager {
    store: Arc<MissionStore>,
    vehicle: Arc<dyn VehicleControl>,
}

impl MissionManager {
    /// Create a manager over `store` commanding `vehicle`.
    pub fn new(store: Arc<MissionStore>, vehicle: Arc<dyn VehicleControl>) -> Self {
        Self { store, vehicle }
    }

    /// Set destination, mission window and takeoff altitude.
    ///
    /// First write wins: ignored while already in `PARAMETERS_SET`. When
    /// applied, the destination is sent to the vehicle as a waypoint at the
    /// takeoff altitude.
    pub async fn set_mission_params(&self, params: MissionParams) -> CommandOutcome {
        info!(
            latitude = params.destination.latitude,
            longitude = params.destination.longitude,
            altitude = params.takeoff_altitude,
            start = params.start_time,
            end = params.end_time,
            "setMissionParams received"
        );

        let outcome = self.store.update(|record| {
            if record.phase == MissionPhase::ParametersSet {
                return CommandOutcome::Ignored {
                    phase: record.phase,
                };
            }
            record.destination = Destination {
                position: params.destination,
                time_window_seconds: params.time_window_seconds(),
            };
            record.takeoff_altitude = params.takeoff_altitude;
            record.phase = MissionPhase::ParametersSet;
            CommandOutcome::Applied
        });

        if !outcome.is_applied() {
            info!("Already in PARAMETERS_SET state, new parameters were not set");
            return outcome;
        }

        let waypoint = Waypoint {
            position: params.destination,
            altitude: params.takeoff_altitude,
        };
        if let Err(err) = self.vehicle.add_waypoint(waypoint).await {
            error!(error = %err, "Failed to send waypoint to vehicle");
        }
        info!("Mission parameters set, phase is now PARAMETERS_SET");
        outcome
    }

    /// Forget the destination and return to `INITIALIZED`.
    ///
    /// Telemetry and both latches are left untouched.
    pub async fn clear_mission_params(&self) -> CommandOutcome {
        info!("clearMissionParams received");
        let outcome = self.store.update(|record| {
            if record.phase == MissionPhase::Initialized {
                return CommandOutcome::Ignored {
                    phase: record.phase,
                };
            }
            record.destination = Destination {
                position: LatLon::default(),
                time_window_seconds: 0.0,
            };
            record.phase = MissionPhase::Initialized;
            CommandOutcome::Applied
        });

        match outcome {
            CommandOutcome::Applied => info!("Mission parameters cleared, phase is now INITIALIZED"),
            CommandOutcome::Ignored { .. } => info!("Already in INITIALIZED state, nothing to clear"),
        }
        outcome
    }

    /// Command takeoff. Only valid in `PARAMETERS_SET`.
    pub async fn take_off(&self) -> CommandOutcome {
        info!("takeOff received");
        let claimed = self.store.update(|record| {
            if record.phase != MissionPhase::ParametersSet {
                return Err(record.phase);
            }
            record.phase = MissionPhase::TakeoffStarted;
            Ok(record.takeoff_altitude)
        });

        let altitude = match claimed {
            Ok(altitude) => altitude,
            Err(phase) => {
                info!(?phase, "Need to be in PARAMETERS_SET state, not taking off");
                return CommandOutcome::Ignored { phase };
            }
        };

        if let Err(err) = self.vehicle.take_off(altitude).await {
            error!(error = %err, "Failed to command takeoff");
        }
        info!(altitude, "Takeoff initiated, phase is now TAKEOFF_STARTED");
        CommandOutcome::Applied
    }

    /// Abandon the mission and fly back to base.
    ///
    /// Only effective between takeoff and the payload drop phase.
    pub async fn abort(&self) -> CommandOutcome {
        info!("abort received");
        let outcome = self.store.update(|record| {
            if !record.phase.is_abortable() {
                return CommandOutcome::Ignored {
                    phase: record.phase,
                };
            }
            record.phase = MissionPhase::ReturningToBase;
            CommandOutcome::Applied
        });

        if let CommandOutcome::Ignored { phase } = outcome {
            info!(?phase, "Current phase does not allow abort");
            return outcome;
        }

        if let Err(err) = self.vehicle.clear_route().await {
            error!(error = %err, "Failed to clear route during abort");
        }
        if let Err(err) = self.vehicle.return_to_base().await {
            error!(error = %err, "Failed to command return to base during abort");
        }
        info!("Abort initiated, phase is now RETURNING_TO_BASE");
        outcome
    }
}
