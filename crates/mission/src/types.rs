//! Mission data model

use serde::{Deserialize, Serialize};

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LatLon {
    /// Create a new position
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Largest per-axis offset to `other`, in degrees.
    pub fn planar_offset(&self, other: &LatLon) -> f64 {
        (self.latitude - other.latitude)
            .abs()
            .max((self.longitude - other.longitude).abs())
    }

    /// True when both axes are strictly closer than `threshold` degrees.
    pub fn is_near(&self, other: &LatLon, threshold: f64) -> bool {
        self.planar_offset(other) < threshold
    }
}

/// Last reported vehicle position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Vehicle position
    pub position: LatLon,
    /// Altitude in meters
    pub altitude: f64,
}

/// Commanded destination.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Destination {
    /// Drop point
    pub position: LatLon,
    /// Allowed mission duration in seconds
    pub time_window_seconds: f64,
}

/// Parameters supplied by the ground station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionParams {
    /// Drop point
    pub destination: LatLon,
    /// Mission start (Unix epoch seconds)
    pub start_time: i64,
    /// Mission end (Unix epoch seconds)
    pub end_time: i64,
    /// Takeoff altitude in meters
    pub takeoff_altitude: f64,
}

impl MissionParams {
    /// Length of the mission window in seconds.
    pub fn time_window_seconds(&self) -> f64 {
        (self.end_time - self.start_time) as f64
    }
}

/// Vehicle state tag carried by a status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleState {
    /// Takeoff in progress
    TakingOff,
    /// Takeoff failed; vehicle is on the ground
    TakeoffFailed,
    /// Flying the route
    Flying,
    /// Flying back to base
    FlyingToBase,
    /// Reached a route waypoint
    WaypointReached,
    /// Reached base
    BaseReached,
    /// Last waypoint cannot be reached
    LastWaypointUnreachable,
    /// Landing in progress
    Landing,
    /// On the ground
    Landed,
}

/// Status report pushed by the vehicle-control subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Vehicle state tag
    pub state: VehicleState,
    /// Current position
    pub position: LatLon,
    /// Current altitude in meters
    pub altitude: f64,
}

impl StatusReport {
    /// Create a new status report
    pub fn new(state: VehicleState, position: LatLon, altitude: f64) -> Self {
        Self {
            state,
            position,
            altitude,
        }
    }

    /// Telemetry carried by this report.
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            position: self.position,
            altitude: self.altitude,
        }
    }
}

/// Discrete mission phase, in mission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionPhase {
    /// No parameters set
    Initialized,
    /// Destination and takeoff altitude set
    ParametersSet,
    /// Takeoff commanded or in progress
    TakeoffStarted,
    /// En route to the drop point
    FlyingToDestination,
    /// At the drop point
    AtDestination,
    /// Payload released
    DropSupplies,
    /// Flying back to base
    ReturningToBase,
    /// Landing at base
    LandingAtBase,
    /// On the ground
    Landed,
}

impl MissionPhase {
    /// Phases in which an abort takes effect.
    pub fn is_abortable(&self) -> bool {
        matches!(
            self,
            MissionPhase::TakeoffStarted
                | MissionPhase::FlyingToDestination
                | MissionPhase::AtDestination
                | MissionPhase::DropSupplies
        )
    }
}

/// Release mechanism latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockLatch {
    /// Release mechanism locked
    Locked,
    /// Release mechanism unlocked
    Unlocked,
}
