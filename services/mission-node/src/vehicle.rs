//! Vehicle control stand-in for the harness.

use async_trait::async_trait;
use skydrop_mission::{CollaboratorError, VehicleControl, Waypoint};
use tracing::info;

/// Vehicle stand-in that accepts every command and only logs it.
#[derive(Debug, Default)]
pub struct LoggingVehicle;

#[async_trait]
impl VehicleControl for LoggingVehicle {
    async fn add_waypoint(&self, waypoint: Waypoint) -> Result<(), CollaboratorError> {
        info!(
            latitude = waypoint.position.latitude,
            longitude = waypoint.position.longitude,
            altitude = waypoint.altitude,
            "vehicle: addWaypoint"
        );
        Ok(())
    }

    async fn clear_route(&self) -> Result<(), CollaboratorError> {
        info!("vehicle: clearRoute");
        Ok(())
    }

    async fn start(&self) -> Result<(), CollaboratorError> {
        info!("vehicle: start");
        Ok(())
    }

    async fn return_to_base(&self) -> Result<(), CollaboratorError> {
        info!("vehicle: returnToBase");
        Ok(())
    }

    async fn land(&self) -> Result<(), CollaboratorError> {
        info!("vehicle: land");
        Ok(())
    }

    async fn subscribe_status(&self, period_ms: u32) -> Result<(), CollaboratorError> {
        info!(period_ms, "vehicle: subscribeStatus");
        Ok(())
    }

    async fn take_off(&self, altitude: f64) -> Result<(), CollaboratorError> {
        info!(altitude, "vehicle: takeOff");
        Ok(())
    }
}
