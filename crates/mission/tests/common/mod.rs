//! Recording collaborators shared by the mission integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use skydrop_mission::{
    AssuranceClient, CollaboratorError, LatLon, MissionParams, PayloadControl, VehicleControl,
    Waypoint,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered trace of every collaborator call.
#[derive(Debug, Default, Clone)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.as_str() == call)
    }
}

/// Vehicle that records commands and can reject the first few subscriptions.
pub struct RecordingVehicle {
    log: CallLog,
    failing_subscribes: AtomicUsize,
}

impl RecordingVehicle {
    pub fn new(log: CallLog) -> Self {
        Self::failing_first_subscribes(log, 0)
    }

    pub fn failing_first_subscribes(log: CallLog, failures: usize) -> Self {
        Self {
            log,
            failing_subscribes: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl VehicleControl for RecordingVehicle {
    async fn add_waypoint(&self, waypoint: Waypoint) -> Result<(), CollaboratorError> {
        self.log.push(format!(
            "vehicle.add_waypoint({}, {}, {})",
            waypoint.position.latitude, waypoint.position.longitude, waypoint.altitude
        ));
        Ok(())
    }

    async fn clear_route(&self) -> Result<(), CollaboratorError> {
        self.log.push("vehicle.clear_route");
        Ok(())
    }

    async fn start(&self) -> Result<(), CollaboratorError> {
        self.log.push("vehicle.start");
        Ok(())
    }

    async fn return_to_base(&self) -> Result<(), CollaboratorError> {
        self.log.push("vehicle.return_to_base");
        Ok(())
    }

    async fn land(&self) -> Result<(), CollaboratorError> {
        self.log.push("vehicle.land");
        Ok(())
    }

    async fn subscribe_status(&self, period_ms: u32) -> Result<(), CollaboratorError> {
        self.log.push(format!("vehicle.subscribe_status({period_ms})"));
        let pending = self.failing_subscribes.load(Ordering::SeqCst);
        if pending > 0 {
            self.failing_subscribes.store(pending - 1, Ordering::SeqCst);
            return Err(CollaboratorError::Unavailable {
                service: "vehicle",
                reason: "not ready".to_string(),
            });
        }
        Ok(())
    }

    async fn take_off(&self, altitude: f64) -> Result<(), CollaboratorError> {
        self.log.push(format!("vehicle.take_off({altitude})"));
        Ok(())
    }
}

/// Payload mechanism that records calls and always releases on request.
pub struct RecordingPayload {
    log: CallLog,
}

impl RecordingPayload {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl PayloadControl for RecordingPayload {
    async fn get_lock_status(&self) -> Result<bool, CollaboratorError> {
        self.log.push("payload.get_lock_status");
        Ok(true)
    }

    async fn has_released(&self) -> Result<bool, CollaboratorError> {
        self.log.push("payload.has_released");
        Ok(false)
    }

    async fn lock_release_mechanism(&self) -> Result<(), CollaboratorError> {
        self.log.push("payload.lock");
        Ok(())
    }

    async fn unlock_release_mechanism(&self) -> Result<(), CollaboratorError> {
        self.log.push("payload.unlock");
        Ok(())
    }

    async fn release_payload(&self) -> Result<bool, CollaboratorError> {
        self.log.push("payload.release");
        Ok(true)
    }
}

/// Assurance client that records reported actions and returns a fixed verdict.
pub struct RecordingAssurance {
    log: CallLog,
    verdict: bool,
}

impl RecordingAssurance {
    pub fn new(log: CallLog, verdict: bool) -> Self {
        Self { log, verdict }
    }
}

#[async_trait]
impl AssuranceClient for RecordingAssurance {
    async fn check_state(&self, action: &str) -> Result<bool, CollaboratorError> {
        self.log.push(format!("assurance.check_state({action})"));
        Ok(self.verdict)
    }
}

pub fn destination() -> LatLon {
    LatLon::new(47.3977, 8.5456)
}

pub fn mission_params() -> MissionParams {
    MissionParams {
        destination: destination(),
        start_time: 1_000,
        end_time: 1_600,
        takeoff_altitude: 10.0,
    }
}

pub fn monitor_path() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../monitor/tests/data/prop1.mon")
}
