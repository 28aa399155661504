//! Telemetry ingest: status reports drive mission phase.
//!
//! | vehicle state               | phase                  | follow-up                          |
//! |-----------------------------|------------------------|------------------------------------|
//! | `TAKING_OFF`                | `TAKEOFF_STARTED`      |                                    |
//! | `TAKEOFF_FAILED`            | `LANDED`               |                                    |
//! | `FLYING`                    | `FLYING_TO_DESTINATION`| `start` if previous tag was `TAKING_OFF` or none |
//! | `FLYING_TO_BASE`            | `RETURNING_TO_BASE`    |                                    |
//! | `WAYPOINT_REACHED`          | `AT_DESTINATION`       | `return_to_base` if already there  |
//! | `BASE_REACHED`              | `LANDING_AT_BASE`      | `land`                             |
//! | `LAST_WAYPOINT_UNREACHABLE` | `RETURNING_TO_BASE`    |                                    |
//! | `LANDING`                   | `LANDING_AT_BASE`      |                                    |
//! | `LANDED`                    | `LANDED`               |                                    |

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::collaborators::VehicleControl;
use crate::store::MissionStore;
use crate::types::{MissionPhase, StatusReport, VehicleState};

/// Vehicle command issued in response to a status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowUp {
    /// `start()`
    Start,
    /// `return_to_base()`
    ReturnToBase,
    /// `land()`
    Land,
}

/// Effect of one status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Phase after the report was applied
    pub phase: MissionPhase,
    /// Follow-up command, if any was issued
    pub follow_up: Option<FollowUp>,
}

/// Applies status reports to the mission store.
///
/// Owned by the single task that consumes the status queue.
pub struct TelemetryIngest {
    store: Arc<MissionStore>,
    vehicle: Arc<dyn VehicleControl>,
    previous: Option<VehicleState>,
}

impl TelemetryIngest {
    /// Create an ingest that has not seen any report yet.
    pub fn new(store: Arc<MissionStore>, vehicle: Arc<dyn VehicleControl>) -> Self {
        Self {
            store,
            vehicle,
            previous: None,
        }
    }

    /// Vehicle state tag of the last applied report.
    pub fn previous_state(&self) -> Option<VehicleState> {
        self.previous
    }

    /// Apply one status report.
    pub async fn apply(&mut self, report: StatusReport) -> IngestOutcome {
        self.store.set_telemetry(report.telemetry());
        info!(
            altitude = report.altitude,
            latitude = report.position.latitude,
            longitude = report.position.longitude,
            state = ?report.state,
            "Vehicle status received"
        );

        let (phase, follow_up) = match report.state {
            VehicleState::TakingOff => (self.enter(MissionPhase::TakeoffStarted), None),
            VehicleState::TakeoffFailed => (self.enter(MissionPhase::Landed), None),
            VehicleState::Flying => {
                let phase = self.enter(MissionPhase::FlyingToDestination);
                let starting = matches!(self.previous, None | Some(VehicleState::TakingOff));
                (phase, starting.then_some(FollowUp::Start))
            }
            VehicleState::FlyingToBase => (self.enter(MissionPhase::ReturningToBase), None),
            VehicleState::WaypointReached => {
                let arrived = self.store.update(|record| {
                    if record.phase == MissionPhase::AtDestination {
                        false
                    } else {
                        record.phase = MissionPhase::AtDestination;
                        true
                    }
                });
                if arrived {
                    info!("Phase is now AT_DESTINATION");
                    (MissionPhase::AtDestination, None)
                } else {
                    (MissionPhase::AtDestination, Some(FollowUp::ReturnToBase))
                }
            }
            VehicleState::BaseReached => {
                (self.enter(MissionPhase::LandingAtBase), Some(FollowUp::Land))
            }
            VehicleState::LastWaypointUnreachable => {
                (self.enter(MissionPhase::ReturningToBase), None)
            }
            VehicleState::Landing => (self.enter(MissionPhase::LandingAtBase), None),
            VehicleState::Landed => (self.enter(MissionPhase::Landed), None),
        };

        if let Some(command) = follow_up {
            self.issue(command).await;
        }
        self.previous = Some(report.state);

        IngestOutcome { phase, follow_up }
    }

    fn enter(&self, phase: MissionPhase) -> MissionPhase {
        self.store.set_phase(phase);
        info!(?phase, "Mission phase changed");
        phase
    }

    async fn issue(&self, command: FollowUp) {
        info!(?command, "Sending follow-up command");
        let result = match command {
            FollowUp::Start => self.vehicle.start().await,
            FollowUp::ReturnToBase => self.vehicle.return_to_base().await,
            FollowUp::Land => self.vehicle.land().await,
        };
        if let Err(err) = result {
            error!(?command, error = %err, "Follow-up command failed");
        }
    }
}
