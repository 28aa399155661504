//! Interfaces to the services the mission core drives.
//!
//! The transport behind these traits is not part of this crate. Calls are
//! awaited inline with no timeout or retry; a failure is logged by the caller
//! and otherwise only affects the telemetry subscription flag.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use skydrop_monitor::AssuranceBroker;

use crate::error::CollaboratorError;
use crate::types::LatLon;

/// Route waypoint sent to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Waypoint position
    pub position: LatLon,
    /// Altitude in meters
    pub altitude: f64,
}

/// Vehicle-control subsystem.
#[async_trait]
pub trait VehicleControl: Send + Sync {
    /// Append a waypoint to the route
    async fn add_waypoint(&self, waypoint: Waypoint) -> Result<(), CollaboratorError>;
    /// Drop every waypoint
    async fn clear_route(&self) -> Result<(), CollaboratorError>;
    /// Start flying the route
    async fn start(&self) -> Result<(), CollaboratorError>;
    /// Fly back to base
    async fn return_to_base(&self) -> Result<(), CollaboratorError>;
    /// Land at the current position
    async fn land(&self) -> Result<(), CollaboratorError>;
    /// Ask for status reports every `period_ms` milliseconds
    async fn subscribe_status(&self, period_ms: u32) -> Result<(), CollaboratorError>;
    /// Take off to `altitude` meters
    async fn take_off(&self, altitude: f64) -> Result<(), CollaboratorError>;
}

/// Payload release mechanism.
#[async_trait]
pub trait PayloadControl: Send + Sync {
    /// True while the release mechanism is locked
    async fn get_lock_status(&self) -> Result<bool, CollaboratorError>;
    /// True once the payload has been released
    async fn has_released(&self) -> Result<bool, CollaboratorError>;
    /// Lock the release mechanism
    async fn lock_release_mechanism(&self) -> Result<(), CollaboratorError>;
    /// Unlock the release mechanism
    async fn unlock_release_mechanism(&self) -> Result<(), CollaboratorError>;
    /// Release the payload; returns whether the payload has been released
    async fn release_payload(&self) -> Result<bool, CollaboratorError>;
}

/// Assurance broker boundary: reports an action to the runtime monitor.
#[async_trait]
pub trait AssuranceClient: Send + Sync {
    /// Step the monitor with `action` and return its verdict
    async fn check_state(&self, action: &str) -> Result<bool, CollaboratorError>;
}

#[async_trait]
impl AssuranceClient for AssuranceBroker {
    async fn check_state(&self, action: &str) -> Result<bool, CollaboratorError> {
        Ok(AssuranceBroker::check_state(self, action))
    }
}
